use alloc::string::ToString;
use core::cell::RefCell;
use core::fmt::Display;

use serde_core::{de, ser};

use crate::error::EnvelopeError;
use crate::registry::TypeRegistry;

#[cfg(all(debug_assertions, feature = "debug"))]
std::thread_local! {
    static TAG_STACK: RefCell<super::TagStack> = const { RefCell::new(super::TagStack::new()) };
}

// -----------------------------------------------------------------------------
// Failure

/// Slot holding the first typed error of one encode or decode call.
///
/// Inside serde every error is a `custom` error of the data format.
/// The typed entry points read the slot afterwards to return the
/// original [`EnvelopeError`] kind.
#[derive(Debug, Default)]
pub(crate) struct Failure(RefCell<Option<EnvelopeError>>);

impl Failure {
    #[inline]
    pub const fn new() -> Self {
        Self(RefCell::new(None))
    }

    fn record(&self, err: &EnvelopeError) {
        let mut slot = self.0.borrow_mut();
        if slot.is_none() {
            log::trace!("envelope call failed: {err}");
            *slot = Some(err.clone());
        }
    }

    /// Returns the recorded error, or wraps the data format error.
    pub fn resolve(&self, err: impl Display) -> EnvelopeError {
        self.0
            .borrow_mut()
            .take()
            .unwrap_or_else(|| EnvelopeError::Format(err.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Scope

/// State shared by all nested envelopes of one encode or decode call.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'a> {
    pub registry: &'a TypeRegistry,
    failure: Option<&'a Failure>,
    depth: usize,
}

impl<'a> Scope<'a> {
    #[inline]
    pub const fn root(registry: &'a TypeRegistry, failure: Option<&'a Failure>) -> Self {
        Self {
            registry,
            failure,
            depth: 0,
        }
    }

    /// Enters one more envelope level.
    pub fn enter(self) -> Result<Self, EnvelopeError> {
        let max_depth = self.registry.config().max_depth;
        if self.depth >= max_depth {
            return Err(EnvelopeError::DepthLimitExceeded(max_depth));
        }
        Ok(Self {
            depth: self.depth + 1,
            ..self
        })
    }

    #[inline]
    fn record(&self, err: &EnvelopeError) {
        if let Some(failure) = self.failure {
            failure.record(err);
        }
    }

    /// Records `err` and converts it into a serialization error.
    pub fn ser_error<E: ser::Error>(&self, err: EnvelopeError) -> E {
        self.record(&err);
        make_custom_error(err, |msg| E::custom(msg))
    }

    /// Records `err` and converts it into a deserialization error.
    pub fn de_error<E: de::Error>(&self, err: EnvelopeError) -> E {
        self.record(&err);
        make_custom_error(err, |msg| E::custom(msg))
    }
}

// -----------------------------------------------------------------------------
// Tag path

/// Runs `f` with `tag` appended to the tag path of error messages.
#[inline]
pub(super) fn with_tag<R>(tag: &str, f: impl FnOnce() -> R) -> R {
    #[cfg(all(debug_assertions, feature = "debug"))]
    TAG_STACK.with_borrow_mut(|stack| stack.push(tag));
    #[cfg(not(all(debug_assertions, feature = "debug")))]
    let _ = tag;

    let output = f();

    #[cfg(all(debug_assertions, feature = "debug"))]
    TAG_STACK.with_borrow_mut(|stack| stack.pop());

    output
}

/// Resets the tag path at the start of a top-level call.
#[inline]
pub(super) fn clear_tags() {
    #[cfg(all(debug_assertions, feature = "debug"))]
    TAG_STACK.with_borrow_mut(|stack| stack.clear());
}

/// Builds a custom error, appending the tag path when available.
#[cfg(all(debug_assertions, feature = "debug"))]
fn make_custom_error<E>(msg: impl Display, custom: impl FnOnce(&dyn Display) -> E) -> E {
    TAG_STACK.with_borrow(|stack| {
        if stack.is_empty() {
            custom(&msg)
        } else {
            custom(&format_args!("{msg} (tag path: {stack:?})"))
        }
    })
}

/// Builds a custom error.
#[cfg(not(all(debug_assertions, feature = "debug")))]
#[inline]
fn make_custom_error<E>(msg: impl Display, custom: impl FnOnce(&dyn Display) -> E) -> E {
    custom(&msg)
}

// -----------------------------------------------------------------------------
// Tests
