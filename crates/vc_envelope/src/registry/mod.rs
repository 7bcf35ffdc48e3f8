//! Provide the tag to codec table used by envelopes.
//!
//! ## Menu
//!
//! - [`TypeRegistry`]: A thread-safe table from [type tags] to [`Codec`]s.
//! - [`Codec`]: A registry entry, either a [`ValueCodec`] or a container codec.
//! - [`ValueCodec`]: A pair of [`EncodeFn`] and [`DecodeFn`] function pointers.
//!
//! ## Bootstrap
//!
//! Every registry lazily registers the built-in scalars and the three
//! container tags on first use, see
//! [`TypeRegistry::ensure_basic_types_registered`].
//!
//! - `bool` `char` `f32` `f64` `String` `Bytes`
//! - `Date` (`SystemTime`) `URL` (`url::Url`)
//! - `i8` `i16` `i32` `i64` `i128` `isize`
//! - `u8` `u16` `u32` `u64` `u128` `usize`
//! - `Array` `Set` `Dictionary`
//!
//! [type tags]: crate::tag

// -----------------------------------------------------------------------------
// Modules

mod bootstrap;
mod codec;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{Codec, DecodeFn, EncodeFn, ValueCodec};
pub use type_registry::TypeRegistry;
