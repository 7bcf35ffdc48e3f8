use core::any::Any;
use core::fmt::Debug;
use core::hash::Hash;

use serde_core::de::{DeserializeOwned, Error};
use serde_core::{Deserializer, Serialize, Serializer};

use crate::AnyValue;
use crate::tag::{ContainerKind, TypeTag};

// -----------------------------------------------------------------------------
// Function pointers

/// Borrows the payload of a value as an erased serializer.
///
/// Returns `None` when the value is not of the codec's type.
pub type EncodeFn = fn(value: &AnyValue) -> Option<&dyn erased_serde::Serialize>;

/// Reads a payload from an erased deserializer.
pub type DecodeFn = fn(
    deserializer: &mut dyn erased_serde::Deserializer<'_>,
) -> Result<AnyValue, erased_serde::Error>;

// -----------------------------------------------------------------------------
// ValueCodec

/// A pair of function pointers encoding and decoding the payload of one tag.
///
/// Usually created through [`TypeRegistry::register`] and
/// [`TypeRegistry::register_hashable`]. [`ValueCodec::new`] accepts
/// hand-written functions for payloads that need a custom wire form.
///
/// # Examples
///
/// ```
/// use vc_envelope::{AnyValue, TypeRegistry, json};
///
/// let registry = TypeRegistry::new();
///
/// // An alias tag for `u8` payloads.
/// registry.register_codec(
///     "legacy::Byte",
///     |value| value.downcast_ref::<u8>().map(|v| v as &dyn erased_serde::Serialize),
///     |deserializer| erased_serde::deserialize::<u8>(deserializer).map(AnyValue::from),
/// );
///
/// let envelope = json::from_str(r#"{"typeName":"legacy::Byte","value":7}"#, &registry).unwrap();
/// assert_eq!(envelope.type_tag(), "legacy::Byte");
/// assert_eq!(envelope.value(), &AnyValue::from(7_u8));
/// ```
///
/// [`TypeRegistry::register`]: crate::TypeRegistry::register
/// [`TypeRegistry::register_hashable`]: crate::TypeRegistry::register_hashable
#[derive(Debug, Clone, Copy)]
pub struct ValueCodec {
    encode: EncodeFn,
    decode: DecodeFn,
}

impl ValueCodec {
    /// Creates a codec from raw function pointers.
    #[inline]
    pub const fn new(encode: EncodeFn, decode: DecodeFn) -> Self {
        Self { encode, decode }
    }

    /// Codec of an application type without hashing support.
    pub fn of<T>() -> Self
    where
        T: TypeTag + Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static,
    {
        fn decode<T>(
            deserializer: &mut dyn erased_serde::Deserializer<'_>,
        ) -> Result<AnyValue, erased_serde::Error>
        where
            T: TypeTag + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static,
        {
            erased_serde::deserialize::<T>(deserializer).map(AnyValue::opaque)
        }

        Self {
            encode: encode::<T>,
            decode: decode::<T>,
        }
    }

    /// Codec of an application type that can be a set element or a map key.
    pub fn of_hashable<T>() -> Self
    where
        T: TypeTag + Serialize + DeserializeOwned + Clone + Eq + Hash + Debug + Send + Sync + 'static,
    {
        fn decode<T>(
            deserializer: &mut dyn erased_serde::Deserializer<'_>,
        ) -> Result<AnyValue, erased_serde::Error>
        where
            T: TypeTag + DeserializeOwned + Clone + Eq + Hash + Debug + Send + Sync + 'static,
        {
            erased_serde::deserialize::<T>(deserializer).map(AnyValue::hashable)
        }

        Self {
            encode: encode::<T>,
            decode: decode::<T>,
        }
    }

    /// Codec of a built-in scalar.
    pub(crate) fn of_scalar<T>() -> Self
    where
        T: Serialize + DeserializeOwned + Into<AnyValue> + 'static,
    {
        fn decode<T: DeserializeOwned + Into<AnyValue>>(
            deserializer: &mut dyn erased_serde::Deserializer<'_>,
        ) -> Result<AnyValue, erased_serde::Error> {
            erased_serde::deserialize::<T>(deserializer).map(Into::into)
        }

        Self {
            encode: encode::<T>,
            decode: decode::<T>,
        }
    }

    /// Borrows the payload of `value`, `None` if the value is not of this codec's type.
    #[inline(always)]
    pub fn encoder<'a>(&self, value: &'a AnyValue) -> Option<&'a dyn erased_serde::Serialize> {
        (self.encode)(value)
    }

    /// Reads a payload with any serde deserializer.
    #[inline(always)]
    pub fn decode<'de, D: Deserializer<'de>>(&self, deserializer: D) -> Result<AnyValue, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.decode)(&mut erased).map_err(D::Error::custom)
    }

    /// Writes the payload of `value`, `None` if the value is not of this codec's type.
    #[inline]
    pub fn encode<S: Serializer>(
        &self,
        value: &AnyValue,
        serializer: S,
    ) -> Option<Result<S::Ok, S::Error>> {
        self.encoder(value).map(|erased| erased.serialize(serializer))
    }
}

fn encode<T: Serialize + Any>(value: &AnyValue) -> Option<&dyn erased_serde::Serialize> {
    value
        .downcast_ref::<T>()
        .map(|value| value as &dyn erased_serde::Serialize)
}

// -----------------------------------------------------------------------------
// Codec

/// A registry entry.
#[derive(Debug, Clone, Copy)]
pub enum Codec {
    /// Payload handled by a pair of function pointers.
    Value(ValueCodec),
    /// Payload is a sequence of nested envelopes.
    Container(ContainerKind),
}

impl Codec {
    /// Returns the container kind of a container codec.
    #[inline]
    pub const fn container_kind(&self) -> Option<ContainerKind> {
        match self {
            Self::Container(kind) => Some(*kind),
            Self::Value(_) => None,
        }
    }
}

impl From<ValueCodec> for Codec {
    #[inline]
    fn from(codec: ValueCodec) -> Self {
        Self::Value(codec)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::ValueCodec;
    use crate::AnyValue;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Celsius(f64);

    crate::impl_type_tag!(Celsius => "tests::Celsius");

    #[test]
    fn encoder_checks_type() {
        let codec = ValueCodec::of::<Celsius>();
        assert!(codec.encoder(&AnyValue::opaque(Celsius(1.0))).is_some());
        assert!(codec.encoder(&AnyValue::from(1.0_f64)).is_none());

        let scalar = ValueCodec::of_scalar::<f64>();
        assert!(scalar.encoder(&AnyValue::from(1.0_f64)).is_some());
        assert!(scalar.encoder(&AnyValue::from(1.0_f32)).is_none());
    }

    #[test]
    fn encode_and_decode_payload() {
        let codec = ValueCodec::of::<Celsius>();

        let text = codec
            .encode(&AnyValue::opaque(Celsius(21.5)), &mut serde_json::Serializer::new(Vec::new()))
            .map(|result| result.is_ok());
        assert_eq!(text, Some(true));

        let mut de = serde_json::Deserializer::from_str("21.5");
        let value = codec.decode(&mut de).unwrap();
        assert_eq!(value, AnyValue::opaque(Celsius(21.5)));
        assert!(!value.is_hashable());
    }
}
