//! Stable type discriminants used as envelope tags.
//!
//! A tag is the string written into the `typeName` field of an envelope.
//! Built-in scalars use their Rust type name (`Bytes`, `Date` and `URL`
//! excepted), containers use the three
//! synthetic tags [`ARRAY_TAG`], [`SET_TAG`] and [`DICTIONARY_TAG`].
//!
//! Application types choose their tag explicitly, either with
//! [`impl_type_tag!`](crate::impl_type_tag) or with `#[derive(TypeTag)]`.
//! The tag is never derived from the Rust symbol name, so renaming or moving
//! a type does not change its wire identity.

use alloc::string::String;
use alloc::vec::Vec;
use std::time::SystemTime;

pub use vc_envelope_derive::TypeTag;

// -----------------------------------------------------------------------------
// Synthetic tags

/// Tag of [`AnyValue::List`](crate::AnyValue::List) payloads.
pub const ARRAY_TAG: &str = "Array";

/// Tag of [`AnyValue::Set`](crate::AnyValue::Set) payloads.
pub const SET_TAG: &str = "Set";

/// Tag of [`AnyValue::Map`](crate::AnyValue::Map) payloads.
pub const DICTIONARY_TAG: &str = "Dictionary";

// -----------------------------------------------------------------------------
// ContainerKind

/// The three container shapes recognized before any registry lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// Ordered sequence, tagged [`ARRAY_TAG`].
    List,
    /// Unordered set, tagged [`SET_TAG`].
    Set,
    /// Key/value mapping, tagged [`DICTIONARY_TAG`].
    Map,
}

impl ContainerKind {
    /// Returns the synthetic tag of this container kind.
    #[inline]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::List => ARRAY_TAG,
            Self::Set => SET_TAG,
            Self::Map => DICTIONARY_TAG,
        }
    }
}

// -----------------------------------------------------------------------------
// TypeTag

/// A type with a stable wire identifier.
///
/// # Examples
///
/// ```
/// use vc_envelope::TypeTag;
///
/// #[derive(TypeTag)]
/// #[type_tag = "geometry::Point"]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// assert_eq!(Point::type_tag(), "geometry::Point");
/// assert_eq!(<i32 as TypeTag>::type_tag(), "i32");
/// ```
pub trait TypeTag {
    /// Returns the tag written into the `typeName` field.
    fn type_tag() -> &'static str;
}

/// Implements [`TypeTag`] for a type with an explicit tag.
///
/// # Examples
///
/// ```
/// use vc_envelope::{TypeTag, impl_type_tag};
///
/// struct Celsius(f64);
///
/// impl_type_tag!(Celsius => "units::Celsius");
///
/// assert_eq!(Celsius::type_tag(), "units::Celsius");
/// ```
#[macro_export]
macro_rules! impl_type_tag {
    ($ty:ty => $tag:expr) => {
        impl $crate::tag::TypeTag for $ty {
            #[inline]
            fn type_tag() -> &'static str {
                $tag
            }
        }
    };
}

crate::impl_type_tag!(bool => "bool");
crate::impl_type_tag!(char => "char");
crate::impl_type_tag!(i8 => "i8");
crate::impl_type_tag!(i16 => "i16");
crate::impl_type_tag!(i32 => "i32");
crate::impl_type_tag!(i64 => "i64");
crate::impl_type_tag!(i128 => "i128");
crate::impl_type_tag!(isize => "isize");
crate::impl_type_tag!(u8 => "u8");
crate::impl_type_tag!(u16 => "u16");
crate::impl_type_tag!(u32 => "u32");
crate::impl_type_tag!(u64 => "u64");
crate::impl_type_tag!(u128 => "u128");
crate::impl_type_tag!(usize => "usize");
crate::impl_type_tag!(f32 => "f32");
crate::impl_type_tag!(f64 => "f64");
crate::impl_type_tag!(String => "String");
crate::impl_type_tag!(Vec<u8> => "Bytes");
crate::impl_type_tag!(SystemTime => "Date");
crate::impl_type_tag!(url::Url => "URL");

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::TypeTag;

    #[derive(TypeTag)]
    #[type_tag = "tests::Marker"]
    struct Marker;

    struct Manual;

    crate::impl_type_tag!(Manual => "tests::Manual");

    #[test]
    fn primitive_tags() {
        assert_eq!(<u8 as TypeTag>::type_tag(), "u8");
        assert_eq!(<f64 as TypeTag>::type_tag(), "f64");
        assert_eq!(<String as TypeTag>::type_tag(), "String");
        assert_eq!(<Vec<u8> as TypeTag>::type_tag(), "Bytes");
        assert_eq!(<std::time::SystemTime as TypeTag>::type_tag(), "Date");
        assert_eq!(<url::Url as TypeTag>::type_tag(), "URL");
    }

    #[test]
    fn custom_tags() {
        assert_eq!(Marker::type_tag(), "tests::Marker");
        assert_eq!(Manual::type_tag(), "tests::Manual");
    }
}
