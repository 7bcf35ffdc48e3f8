use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use core::slice::Iter;

/// Helper struct for managing a stack of envelope tags.
///
/// Tracks the path of nested envelopes while encoding and decoding,
/// so that error messages can point at the failing element.
#[derive(Default, Clone)]
pub(super) struct TagStack {
    stack: Vec<String>,
}

impl TagStack {
    /// Create a new empty [`TagStack`].
    pub const fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push a new tag onto the stack.
    pub fn push(&mut self, tag: &str) {
        self.stack.push(tag.into());
    }

    /// Pop the last tag off the stack.
    pub fn pop(&mut self) {
        self.stack.pop();
    }

    /// clear the stack
    pub fn clear(&mut self) {
        self.stack.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Get an iterator over the stack in the order they were pushed.
    pub fn iter(&self) -> Iter<'_, String> {
        self.stack.iter()
    }
}

impl Debug for TagStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mut iter = self.iter();

        if let Some(first) = iter.next() {
            write!(f, "`{first}`")?;
        }

        for tag in iter {
            write!(f, " -> `{tag}`")?;
        }

        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests
