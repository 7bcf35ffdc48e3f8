use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt::Debug;
use core::hash::{Hash, Hasher};

use super::{AnyMap, AnySet, DynValue, Hashable, Plain};
use crate::tag::{ContainerKind, TypeTag};

/// Invokes `$callback! { Variant(type), ... }` with every scalar variant.
macro_rules! for_each_scalar {
    ($callback:ident) => {
        $callback! {
            Bool(bool),
            Char(char),
            I8(i8),
            I16(i16),
            I32(i32),
            I64(i64),
            I128(i128),
            Isize(isize),
            U8(u8),
            U16(u16),
            U32(u32),
            U64(u64),
            U128(u128),
            Usize(usize),
            F32(f32),
            F64(f64),
            String(String),
            Bytes(Vec<u8>),
            Date(std::time::SystemTime),
            Url(url::Url)
        }
    };
}

pub(crate) use for_each_scalar;

// -----------------------------------------------------------------------------
// AnyValue

/// A value of a not-statically-known type.
///
/// The variants enumerate every shape understood by the envelope protocol.
/// Application types enter through [`AnyValue::Opaque`], identified by their
/// [`TypeTag`].
///
/// # Equality
///
/// Floats compare by bit pattern, so `NaN == NaN` and `0.0 != -0.0`.
/// This keeps `Eq` and `Hash` consistent for set elements and map keys.
///
/// # Examples
///
/// ```
/// use vc_envelope::AnyValue;
///
/// let list = AnyValue::list(["123".into(), AnyValue::from(123_i64)]);
///
/// let items = list.as_list().unwrap();
/// assert_eq!(items[0].as_str(), Some("123"));
/// assert_eq!(items[1].downcast_ref::<i64>(), Some(&123));
/// assert_eq!(list.type_tag(), "Array");
/// ```
#[derive(Debug, Clone)]
pub enum AnyValue {
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    Usize(usize),
    F32(f32),
    F64(f64),
    String(String),
    /// Binary data, tagged `Bytes`.
    Bytes(Vec<u8>),
    /// A point in time, tagged `Date`.
    Date(std::time::SystemTime),
    /// An absolute URL, tagged `URL`.
    Url(url::Url),
    /// Ordered sequence, duplicates allowed.
    List(Vec<AnyValue>),
    /// Unordered set of hashable values.
    Set(AnySet),
    /// Mapping from hashable keys to values.
    Map(AnyMap),
    /// A registered application type.
    Opaque(Box<dyn DynValue>),
}

impl AnyValue {
    /// Boxes an application value without hashing support.
    ///
    /// Such a value cannot be a set element or a map key.
    #[inline]
    pub fn opaque<T>(value: T) -> Self
    where
        T: TypeTag + Clone + PartialEq + Debug + Send + Sync + 'static,
    {
        Self::Opaque(Box::new(Plain(value)))
    }

    /// Boxes an application value that can be a set element or a map key.
    #[inline]
    pub fn hashable<T>(value: T) -> Self
    where
        T: TypeTag + Clone + Eq + Hash + Debug + Send + Sync + 'static,
    {
        Self::Opaque(Box::new(Hashable(value)))
    }

    /// Collects values into an [`AnyValue::List`].
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AnyValue>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns the container kind, or `None` for scalars and application values.
    #[inline]
    pub fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Self::List(_) => Some(ContainerKind::List),
            Self::Set(_) => Some(ContainerKind::Set),
            Self::Map(_) => Some(ContainerKind::Map),
            _ => None,
        }
    }

    /// Returns the tag identifying this value on the wire.
    pub fn type_tag(&self) -> &'static str {
        macro_rules! scalar_tag {
            ($($variant:ident($ty:ty)),*) => {
                match self {
                    $(Self::$variant(_) => <$ty as TypeTag>::type_tag(),)*
                    Self::List(_) => ContainerKind::List.tag(),
                    Self::Set(_) => ContainerKind::Set.tag(),
                    Self::Map(_) => ContainerKind::Map.tag(),
                    Self::Opaque(value) => value.value_tag(),
                }
            };
        }

        for_each_scalar!(scalar_tag)
    }

    /// Whether the value can be a set element or a map key.
    pub fn is_hashable(&self) -> bool {
        match self {
            Self::List(items) => items.iter().all(Self::is_hashable),
            Self::Set(_) | Self::Map(_) => false,
            Self::Opaque(value) => value.is_hashable(),
            _ => true,
        }
    }

    /// Returns the concrete value as [`Any`].
    ///
    /// Scalars expose their Rust type, containers expose `Vec<AnyValue>`,
    /// [`AnySet`] and [`AnyMap`], application values expose their own type.
    pub fn as_any(&self) -> &dyn Any {
        macro_rules! scalar_any {
            ($($variant:ident($ty:ty)),*) => {
                match self {
                    $(Self::$variant(value) => value,)*
                    Self::List(items) => items,
                    Self::Set(set) => set,
                    Self::Map(map) => map,
                    Self::Opaque(value) => value.as_any(),
                }
            };
        }

        for_each_scalar!(scalar_any)
    }

    fn into_any(self) -> Box<dyn Any> {
        macro_rules! scalar_into_any {
            ($($variant:ident($ty:ty)),*) => {
                match self {
                    $(Self::$variant(value) => Box::new(value),)*
                    Self::List(items) => Box::new(items),
                    Self::Set(set) => Box::new(set),
                    Self::Map(map) => Box::new(map),
                    Self::Opaque(value) => value.into_any(),
                }
            };
        }

        for_each_scalar!(scalar_into_any)
    }

    /// Returns `true` if the concrete value is a `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Returns a reference to the concrete value if it is a `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Takes the concrete value out if it is a `T`.
    #[inline]
    pub fn take<T: Any>(self) -> Option<T> {
        self.into_any().downcast::<T>().ok().map(|value| *value)
    }

    /// Returns the text of an [`AnyValue::String`].
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the elements of an [`AnyValue::List`].
    #[inline]
    pub fn as_list(&self) -> Option<&[AnyValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the inner set of an [`AnyValue::Set`].
    #[inline]
    pub fn as_set(&self) -> Option<&AnySet> {
        match self {
            Self::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Returns the inner map of an [`AnyValue::Map`].
    #[inline]
    pub fn as_map(&self) -> Option<&AnyMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

// -----------------------------------------------------------------------------
// Equality & Hash

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::I128(a), Self::I128(b)) => a == b,
            (Self::Isize(a), Self::Isize(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::U128(a), Self::U128(b)) => a == b,
            (Self::Usize(a), Self::Usize(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Url(a), Self::Url(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => a.eq_value(&**b),
            _ => false,
        }
    }
}

impl Eq for AnyValue {}

impl Hash for AnyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(value) => value.hash(state),
            Self::Char(value) => value.hash(state),
            Self::I8(value) => value.hash(state),
            Self::I16(value) => value.hash(state),
            Self::I32(value) => value.hash(state),
            Self::I64(value) => value.hash(state),
            Self::I128(value) => value.hash(state),
            Self::Isize(value) => value.hash(state),
            Self::U8(value) => value.hash(state),
            Self::U16(value) => value.hash(state),
            Self::U32(value) => value.hash(state),
            Self::U64(value) => value.hash(state),
            Self::U128(value) => value.hash(state),
            Self::Usize(value) => value.hash(state),
            Self::F32(value) => value.to_bits().hash(state),
            Self::F64(value) => value.to_bits().hash(state),
            Self::String(value) => value.hash(state),
            Self::Bytes(value) => value.hash(state),
            Self::Date(value) => value.hash(state),
            Self::Url(value) => value.hash(state),
            Self::List(items) => items.hash(state),
            // Order independent, equal containers have equal lengths.
            Self::Set(set) => set.len().hash(state),
            Self::Map(map) => map.len().hash(state),
            Self::Opaque(value) => value.hash_value(state),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_scalar {
    ($($variant:ident($ty:ty)),*) => {
        $(
            impl From<$ty> for AnyValue {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

for_each_scalar!(impl_from_scalar);

impl From<&str> for AnyValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<Vec<AnyValue>> for AnyValue {
    #[inline]
    fn from(value: Vec<AnyValue>) -> Self {
        Self::List(value)
    }
}

impl From<AnySet> for AnyValue {
    #[inline]
    fn from(value: AnySet) -> Self {
        Self::Set(value)
    }
}

impl From<AnyMap> for AnyValue {
    #[inline]
    fn from(value: AnyMap) -> Self {
        Self::Map(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::AnyValue;
    use crate::tag::ContainerKind;
    use crate::value::{AnyMap, AnySet};

    #[derive(Debug, Clone, PartialEq)]
    struct Celsius(f64);

    crate::impl_type_tag!(Celsius => "tests::Celsius");

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct UserId(u32);

    crate::impl_type_tag!(UserId => "tests::UserId");

    #[test]
    fn tags() {
        assert_eq!(AnyValue::from(1_u16).type_tag(), "u16");
        assert_eq!(AnyValue::from("a").type_tag(), "String");
        assert_eq!(AnyValue::Bytes(vec![1, 2]).type_tag(), "Bytes");
        assert_eq!(AnyValue::from(std::time::UNIX_EPOCH).type_tag(), "Date");
        let url = url::Url::parse("https://example.com/a").unwrap();
        assert_eq!(AnyValue::from(url).type_tag(), "URL");
        assert_eq!(AnyValue::list([1_i32]).type_tag(), "Array");
        assert_eq!(AnyValue::Set(AnySet::new()).type_tag(), "Set");
        assert_eq!(AnyValue::Map(AnyMap::new()).type_tag(), "Dictionary");
        assert_eq!(AnyValue::opaque(Celsius(1.0)).type_tag(), "tests::Celsius");
    }

    #[test]
    fn container_kind() {
        assert_eq!(
            AnyValue::list([1_i32]).container_kind(),
            Some(ContainerKind::List)
        );
        assert_eq!(AnyValue::from(true).container_kind(), None);
        assert_eq!(AnyValue::hashable(UserId(3)).container_kind(), None);
    }

    #[test]
    fn equality_keeps_concrete_type() {
        assert_ne!(AnyValue::from(123_i32), AnyValue::from(123_i64));
        assert_ne!(AnyValue::from("123"), AnyValue::from(123_i64));
        assert_eq!(AnyValue::from(f64::NAN), AnyValue::from(f64::NAN));
        assert_ne!(AnyValue::from(0.0_f64), AnyValue::from(-0.0_f64));
        assert_eq!(
            AnyValue::opaque(Celsius(2.5)),
            AnyValue::opaque(Celsius(2.5))
        );
        assert_ne!(AnyValue::opaque(Celsius(2.5)), AnyValue::from(2.5_f64));
    }

    #[test]
    fn hashability() {
        assert!(AnyValue::from(1.5_f32).is_hashable());
        assert!(AnyValue::list(["a", "b"]).is_hashable());
        assert!(AnyValue::hashable(UserId(1)).is_hashable());
        assert!(!AnyValue::opaque(Celsius(1.0)).is_hashable());
        assert!(!AnyValue::List(vec![AnyValue::opaque(Celsius(1.0))]).is_hashable());
        assert!(!AnyValue::Set(AnySet::new()).is_hashable());
        assert!(!AnyValue::Map(AnyMap::new()).is_hashable());
    }

    #[test]
    fn downcast() {
        let value = AnyValue::from(String::from("text"));
        assert!(value.is::<String>());
        assert_eq!(value.downcast_ref::<String>().map(String::as_str), Some("text"));
        assert_eq!(value.take::<String>().as_deref(), Some("text"));

        let value = AnyValue::hashable(UserId(9));
        assert_eq!(value.downcast_ref::<UserId>(), Some(&UserId(9)));
        assert_eq!(value.clone().take::<UserId>(), Some(UserId(9)));
        assert_eq!(value.take::<Celsius>(), None);
    }
}
