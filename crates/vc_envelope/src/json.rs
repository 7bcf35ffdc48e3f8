//! JSON entry points based on `serde_json`.
//!
//! Every function returns [`EnvelopeError`] kinds, failures of JSON itself
//! are reported as [`EnvelopeError::Format`].
//!
//! # Examples
//!
//! ```
//! use vc_envelope::{AnyValue, Envelope, TypeRegistry, json};
//!
//! let registry = TypeRegistry::new();
//! let envelope = Envelope::new(AnyValue::list(["123".into(), AnyValue::from(123_i64)]), &registry).unwrap();
//!
//! let value = json::to_value(&envelope, &registry).unwrap();
//! assert_eq!(value["value"][1]["typeName"], "i64");
//!
//! let decoded = json::from_value(&value, &registry).unwrap();
//! assert_eq!(decoded, envelope);
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::error::{EnvelopeError, Result};
use crate::registry::TypeRegistry;
use crate::Envelope;

/// Encodes an envelope as compact JSON text.
pub fn to_string(envelope: &Envelope, registry: &TypeRegistry) -> Result<String> {
    let mut buffer = Vec::with_capacity(128);
    envelope.encode(registry, &mut serde_json::Serializer::new(&mut buffer))?;
    into_text(buffer)
}

/// Encodes an envelope as indented JSON text.
pub fn to_string_pretty(envelope: &Envelope, registry: &TypeRegistry) -> Result<String> {
    let mut buffer = Vec::with_capacity(128);
    envelope.encode(registry, &mut serde_json::Serializer::pretty(&mut buffer))?;
    into_text(buffer)
}

/// Encodes an envelope as a [`serde_json::Value`].
pub fn to_value(envelope: &Envelope, registry: &TypeRegistry) -> Result<serde_json::Value> {
    envelope.encode(registry, serde_json::value::Serializer)
}

/// Decodes an envelope from JSON text.
///
/// Trailing characters other than whitespace are rejected.
pub fn from_str(text: &str, registry: &TypeRegistry) -> Result<Envelope> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let envelope = Envelope::decode(registry, &mut deserializer)?;
    deserializer
        .end()
        .map_err(|err| EnvelopeError::Format(err.to_string()))?;
    Ok(envelope)
}

/// Decodes an envelope from a [`serde_json::Value`].
pub fn from_value(value: &serde_json::Value, registry: &TypeRegistry) -> Result<Envelope> {
    Envelope::decode(registry, value)
}

#[inline]
fn into_text(buffer: Vec<u8>) -> Result<String> {
    String::from_utf8(buffer).map_err(|err| EnvelopeError::Format(err.to_string()))
}

// -----------------------------------------------------------------------------
// Tests
