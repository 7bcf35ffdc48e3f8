//! The closed set of values an envelope can carry.
//!
//! ## Menu
//!
//! - [`AnyValue`]: scalars, the three containers and registered application types.
//! - [`AnySet`]: unordered set of hashable values.
//! - [`AnyMap`]: mapping from hashable keys to values.
//! - [`DynValue`]: object-safe view of an application value.
//!
//! ## Hashability
//!
//! Set elements and map keys must be hashable:
//!
//! - every scalar is hashable, floats compare and hash by bit pattern;
//! - a list is hashable when all of its elements are;
//! - sets and maps are never hashable;
//! - an application value is hashable when it was built with
//!   [`AnyValue::hashable`] (or decoded through a codec registered with
//!   [`TypeRegistry::register_hashable`]).
//!
//! [`TypeRegistry::register_hashable`]: crate::TypeRegistry::register_hashable

// -----------------------------------------------------------------------------
// Modules

mod any_value;
mod hash;
mod map;
mod opaque;
mod set;

// -----------------------------------------------------------------------------
// Exports

pub use any_value::AnyValue;
pub use hash::FixedHashState;
pub use map::AnyMap;
pub use opaque::DynValue;
pub use set::AnySet;

pub(crate) use any_value::for_each_scalar;
pub(crate) use hash::HashMap;
pub(crate) use opaque::{Hashable, Plain};
