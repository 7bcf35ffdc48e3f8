//! Serde drivers writing and reading envelopes.
//!
//! # Overview
//!
//! - [`EnvelopeSerializer`]: A [`Serialize`] view of an [`Envelope`] bound to a registry.
//! - [`EnvelopeSeed`]: A [`DeserializeSeed`] producing an [`Envelope`] from any data format.
//!
//! Both are usable with any serde data format. Errors travel as the
//! format's `custom` errors, use [`Envelope::encode`] and
//! [`Envelope::decode`] to receive [`EnvelopeError`] kinds instead.
//!
//! # Wire shape
//!
//! An envelope is a struct named `Envelope` with two fields, `typeName`
//! followed by `value` (JSON shown):
//!
//! ```json
//! { "typeName": "Dictionary", "value": [
//!     { "typeName": "String", "value": "a" },
//!     { "typeName": "i64", "value": 1 }
//! ] }
//! ```
//!
//! - Scalars and registered types: the value's own serde form.
//! - `Array` and `Set`: a sequence of nested envelopes.
//! - `Dictionary`: a sequence alternating key and value envelopes.
//!
//! Keyed formats accept the two fields in either order, formats that
//! write structs as sequences read `[typeName, value]`.
//!
//! [`Serialize`]: serde_core::Serialize
//! [`DeserializeSeed`]: serde_core::de::DeserializeSeed
//! [`Envelope`]: crate::Envelope
//! [`Envelope::encode`]: crate::Envelope::encode
//! [`Envelope::decode`]: crate::Envelope::decode
//! [`EnvelopeError`]: crate::EnvelopeError

// -----------------------------------------------------------------------------
// Debug utils

#[cfg(all(debug_assertions, feature = "debug"))]
mod tag_stack;
#[cfg(all(debug_assertions, feature = "debug"))]
use tag_stack::TagStack;

// -----------------------------------------------------------------------------
// Modules

mod de;
mod scope;
mod ser;

// -----------------------------------------------------------------------------
// Exports

pub use de::EnvelopeSeed;
pub use ser::EnvelopeSerializer;

pub(crate) use scope::Failure;

// -----------------------------------------------------------------------------
// Wire names

/// Serde name of the envelope struct.
pub(crate) const ENVELOPE_NAME: &str = "Envelope";
pub(crate) const TYPE_NAME_FIELD: &str = "typeName";
pub(crate) const VALUE_FIELD: &str = "value";
pub(crate) const FIELDS: &[&str] = &[TYPE_NAME_FIELD, VALUE_FIELD];
