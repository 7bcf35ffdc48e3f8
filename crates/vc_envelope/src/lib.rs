#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

// Allow the derive macro to refer to this crate by name inside it.
extern crate self as vc_envelope;

// -----------------------------------------------------------------------------
// Modules

mod envelope;

pub mod config;
pub mod error;
pub mod registry;
pub mod serde;
pub mod tag;
pub mod value;

#[cfg(feature = "json")]
pub mod json;

// -----------------------------------------------------------------------------
// Exports

pub use config::{DEFAULT_MAX_DEPTH, EnvelopeConfig};
pub use envelope::Envelope;
pub use error::{EnvelopeError, Result};
pub use registry::TypeRegistry;
pub use tag::TypeTag;
pub use value::{AnyMap, AnySet, AnyValue};

/// Re-export of the derive macro crate.
pub use vc_envelope_derive as derive;
