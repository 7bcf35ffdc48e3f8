use alloc::borrow::Cow;
use alloc::string::String;

use serde_core::de::DeserializeSeed;
use serde_core::{Deserializer, Serialize, Serializer};

use crate::error::{EnvelopeError, Result};
use crate::registry::TypeRegistry;
use crate::serde::{EnvelopeSeed, EnvelopeSerializer, Failure};
use crate::value::AnyValue;

// -----------------------------------------------------------------------------
// Envelope

/// A value paired with the tag that identifies its codec.
///
/// An envelope is built once and never mutated. Its tag must have a codec
/// in the registry both when it is encoded and when it is decoded.
///
/// # Examples
///
/// ```
/// use vc_envelope::{AnyMap, AnyValue, Envelope, TypeRegistry, json};
///
/// let registry = TypeRegistry::new();
///
/// let mut map = AnyMap::new();
/// map.insert("a".into(), 1_i64.into()).unwrap();
///
/// let envelope = Envelope::new(AnyValue::Map(map), &registry).unwrap();
/// assert_eq!(envelope.type_tag(), "Dictionary");
///
/// let text = json::to_string(&envelope, &registry).unwrap();
/// assert_eq!(
///     text,
///     r#"{"typeName":"Dictionary","value":[{"typeName":"String","value":"a"},{"typeName":"i64","value":1}]}"#,
/// );
///
/// let decoded = json::from_str(&text, &registry).unwrap();
/// assert_eq!(decoded, envelope);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    type_tag: Cow<'static, str>,
    value: AnyValue,
}

impl Envelope {
    /// Wraps a value, bootstrapping the registry if needed.
    ///
    /// Lists, sets and maps are always accepted and tagged `Array`, `Set`
    /// and `Dictionary`, their elements are checked when encoding.
    /// Other values are tagged with their [`TypeTag`].
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::UnregisteredTypeEncode`] if the tag has no codec.
    ///
    /// [`TypeTag`]: crate::TypeTag
    pub fn new(value: AnyValue, registry: &TypeRegistry) -> Result<Self> {
        registry.ensure_basic_types_registered();

        let type_tag = match value.container_kind() {
            Some(kind) => kind.tag(),
            None => {
                let tag = value.type_tag();
                if !registry.contains(tag) {
                    return Err(EnvelopeError::UnregisteredTypeEncode(tag.into()));
                }
                tag
            }
        };

        Ok(Self {
            type_tag: Cow::Borrowed(type_tag),
            value,
        })
    }

    /// Wraps an optional value, an absent value yields no envelope.
    pub fn from_optional(value: Option<AnyValue>, registry: &TypeRegistry) -> Result<Option<Self>> {
        value.map(|value| Self::new(value, registry)).transpose()
    }

    #[inline]
    pub(crate) fn from_parts(type_tag: String, value: AnyValue) -> Self {
        Self {
            type_tag: Cow::Owned(type_tag),
            value,
        }
    }

    /// Returns the tag written into the `typeName` field.
    #[inline]
    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    /// Returns the wrapped value.
    #[inline]
    pub fn value(&self) -> &AnyValue {
        &self.value
    }

    /// Unwraps the value.
    #[inline]
    pub fn into_value(self) -> AnyValue {
        self.value
    }

    /// Returns a [`Serialize`] view of this envelope bound to `registry`.
    ///
    /// Errors surface as the data format's own error type,
    /// see [`encode`](Self::encode) for typed errors.
    #[inline]
    pub fn serialize_with<'a>(&'a self, registry: &'a TypeRegistry) -> EnvelopeSerializer<'a> {
        EnvelopeSerializer::new(self, registry)
    }

    /// Writes the envelope with any serde serializer.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::UnregisteredTypeEncode`] for the first tag without a codec,
    ///   the envelope's own tag or a nested element's.
    /// - [`EnvelopeError::TypeMismatch`] if a codec cannot handle its value.
    /// - [`EnvelopeError::DepthLimitExceeded`] for values nested too deeply.
    /// - [`EnvelopeError::Format`] for errors of the serializer itself.
    pub fn encode<S: Serializer>(&self, registry: &TypeRegistry, serializer: S) -> Result<S::Ok> {
        let failure = Failure::new();
        EnvelopeSerializer::with_failure(self, registry, &failure)
            .serialize(serializer)
            .map_err(|err| failure.resolve(err))
    }

    /// Reads an envelope with any serde deserializer, bootstrapping the registry if needed.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::UnregisteredTypeDecode`] for the first `typeName` without a codec.
    /// - [`EnvelopeError::NonHashableElement`] for set elements and map keys that cannot be hashed.
    /// - [`EnvelopeError::MalformedPairs`] and [`EnvelopeError::TruncatedPair`] for
    ///   dictionaries with an odd number of envelopes.
    /// - [`EnvelopeError::DepthLimitExceeded`] for input nested too deeply.
    /// - [`EnvelopeError::Format`] for malformed input.
    pub fn decode<'de, D: Deserializer<'de>>(registry: &TypeRegistry, deserializer: D) -> Result<Self> {
        let failure = Failure::new();
        EnvelopeSeed::with_failure(registry, &failure)
            .deserialize(deserializer)
            .map_err(|err| failure.resolve(err))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "json"))]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;
    use std::time::{Duration, UNIX_EPOCH};

    use serde::{Deserialize, Serialize};
    use url::Url;

    use super::Envelope;
    use crate::config::EnvelopeConfig;
    use crate::{AnyMap, AnySet, AnyValue, EnvelopeError, TypeRegistry, TypeTag, json};

    #[derive(TypeTag, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[type_tag = "tests::Celsius"]
    struct Celsius(f64);

    #[derive(TypeTag, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[type_tag = "tests::UserId"]
    struct UserId(u32);

    fn round_trip(value: AnyValue, registry: &TypeRegistry) -> AnyValue {
        let envelope = Envelope::new(value, registry).unwrap();
        let text = json::to_string(&envelope, registry).unwrap();
        let decoded = json::from_str(&text, registry).unwrap();
        assert_eq!(decoded.type_tag(), envelope.type_tag());
        decoded.into_value()
    }

    #[test]
    fn scalar_round_trip() {
        let registry = TypeRegistry::new();

        let scalars = [
            AnyValue::from(true),
            AnyValue::from('x'),
            AnyValue::from(-8_i8),
            AnyValue::from(-16_i16),
            AnyValue::from(-32_i32),
            AnyValue::from(-64_i64),
            AnyValue::from(-128_i128),
            AnyValue::from(-1_isize),
            AnyValue::from(8_u8),
            AnyValue::from(16_u16),
            AnyValue::from(32_u32),
            AnyValue::from(u64::MAX),
            AnyValue::from(128_u128),
            AnyValue::from(1_usize),
            AnyValue::from(1.5_f32),
            AnyValue::from(-2.25_f64),
            AnyValue::from("text"),
            AnyValue::Bytes(vec![0, 1, 255]),
            AnyValue::from(UNIX_EPOCH + Duration::new(1_700_000_000, 250)),
            AnyValue::from(Url::parse("https://example.com/path?q=1").unwrap()),
        ];

        for value in scalars {
            assert_eq!(round_trip(value.clone(), &registry), value);
        }
    }

    #[test]
    fn scalar_wire_shape() {
        let registry = TypeRegistry::new();
        let envelope = Envelope::new(AnyValue::from(123_i64), &registry).unwrap();

        assert_eq!(
            json::to_string(&envelope, &registry).unwrap(),
            r#"{"typeName":"i64","value":123}"#
        );
    }

    #[test]
    fn nested_list() {
        let registry = TypeRegistry::new();
        let value = AnyValue::list([
            AnyValue::list(["1", "2", "3"]),
            AnyValue::list(["4", "5", "6"]),
        ]);

        let decoded = round_trip(value.clone(), &registry);
        assert_eq!(decoded, value);

        let rows = decoded.as_list().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].as_list().unwrap()[2].as_str(), Some("6"));
    }

    #[test]
    fn mixed_list_keeps_types() {
        let registry = TypeRegistry::new();
        let value = AnyValue::list([AnyValue::from("123"), AnyValue::from(123_i64)]);

        let decoded = round_trip(value, &registry);
        let items = decoded.as_list().unwrap();
        assert_eq!(items[0].as_str(), Some("123"));
        assert_eq!(items[1].downcast_ref::<i64>(), Some(&123));
    }

    #[test]
    fn mixed_set() {
        let registry = TypeRegistry::new();
        let set = AnySet::try_from_values([
            AnyValue::from("123"),
            AnyValue::from(123_i64),
            AnyValue::from("123"),
        ])
        .unwrap();
        assert_eq!(set.len(), 2);

        let decoded = round_trip(AnyValue::Set(set.clone()), &registry);
        assert_eq!(decoded.as_set(), Some(&set));
        assert!(set.contains(&AnyValue::from("123")));
        assert!(set.contains(&AnyValue::from(123_i64)));
        assert!(!set.contains(&AnyValue::from(123_i32)));
    }

    #[test]
    fn map_round_trip() {
        let registry = TypeRegistry::new();
        registry.register_hashable::<UserId>();
        registry.register::<Celsius>();

        let mut map = AnyMap::new();
        map.insert(AnyValue::hashable(UserId(1)), AnyValue::opaque(Celsius(20.5)))
            .unwrap();
        map.insert(AnyValue::from("b"), AnyValue::from(2_i64)).unwrap();
        map.insert(AnyValue::list([1_u8, 2]), AnyValue::from(true)).unwrap();

        let decoded = round_trip(AnyValue::Map(map.clone()), &registry);
        assert_eq!(decoded.as_map(), Some(&map));

        let map = decoded.as_map().unwrap();
        let value = map.get(&AnyValue::hashable(UserId(1))).unwrap();
        assert_eq!(value.downcast_ref::<Celsius>(), Some(&Celsius(20.5)));
    }

    #[test]
    fn map_with_odd_length_is_malformed() {
        let registry = TypeRegistry::new();
        let value = serde_json::json!({
            "typeName": "Dictionary",
            "value": [
                { "typeName": "String", "value": "a" },
                { "typeName": "i64", "value": 1 },
                { "typeName": "String", "value": "b" },
            ],
        });

        assert_eq!(
            json::from_value(&value, &registry),
            Err(EnvelopeError::MalformedPairs)
        );
    }

    #[test]
    fn map_with_missing_value_is_truncated() {
        let registry = TypeRegistry::new();
        let text = r#"{"typeName":"Dictionary","value":[{"typeName":"String","value":"a"}]}"#;

        assert_eq!(
            json::from_str(text, &registry),
            Err(EnvelopeError::TruncatedPair)
        );
    }

    #[test]
    fn map_with_set_key_is_rejected() {
        let registry = TypeRegistry::new();
        let text = r#"{"typeName":"Dictionary","value":[
            {"typeName":"Set","value":[]},
            {"typeName":"i64","value":1}
        ]}"#;

        assert_eq!(
            json::from_str(text, &registry),
            Err(EnvelopeError::NonHashableElement("Set".into()))
        );
    }

    #[test]
    fn set_with_non_hashable_element_is_rejected() {
        let registry = TypeRegistry::new();
        registry.register::<Celsius>();

        let text = r#"{"typeName":"Set","value":[{"typeName":"tests::Celsius","value":1.0}]}"#;
        assert_eq!(
            json::from_str(text, &registry),
            Err(EnvelopeError::NonHashableElement("tests::Celsius".into()))
        );

        let value = serde_json::json!({
            "typeName": "Set",
            "value": [{ "typeName": "Dictionary", "value": [] }],
        });
        assert_eq!(
            json::from_value(&value, &registry),
            Err(EnvelopeError::NonHashableElement("Dictionary".into()))
        );
    }

    #[test]
    fn unregistered_encode_then_register() {
        let registry = TypeRegistry::new();

        assert_eq!(
            Envelope::new(AnyValue::opaque(Celsius(1.0)), &registry),
            Err(EnvelopeError::UnregisteredTypeEncode("tests::Celsius".into()))
        );

        registry.register::<Celsius>();
        let envelope = Envelope::new(AnyValue::opaque(Celsius(1.0)), &registry).unwrap();
        assert_eq!(envelope.type_tag(), "tests::Celsius");
    }

    #[test]
    fn unregistered_list_element() {
        let registry = TypeRegistry::new();
        let value = AnyValue::list([AnyValue::from(1_i64), AnyValue::opaque(Celsius(1.0))]);

        // Containers are accepted at construction, elements are checked when encoding.
        let envelope = Envelope::new(value, &registry).unwrap();
        assert_eq!(
            json::to_string(&envelope, &registry),
            Err(EnvelopeError::UnregisteredTypeEncode("tests::Celsius".into()))
        );

        registry.register::<Celsius>();
        assert!(json::to_string(&envelope, &registry).is_ok());
    }

    #[test]
    fn unregistered_decode_then_register() {
        let registry = TypeRegistry::new();
        let text = r#"{"typeName":"tests::Celsius","value":36.6}"#;

        let err = json::from_str(text, &registry).unwrap_err();
        assert_eq!(err, EnvelopeError::UnregisteredTypeDecode("tests::Celsius".into()));
        assert!(err.is_unregistered());

        registry.register::<Celsius>();
        let envelope = json::from_str(text, &registry).unwrap();
        assert_eq!(envelope.value().downcast_ref::<Celsius>(), Some(&Celsius(36.6)));
    }

    #[test]
    fn codec_type_mismatch() {
        let registry = TypeRegistry::new();
        let envelope = Envelope::new(AnyValue::from(1_u8), &registry).unwrap();

        registry.register_codec(
            "u8",
            |value| {
                value
                    .downcast_ref::<u16>()
                    .map(|value| value as &dyn erased_serde::Serialize)
            },
            |deserializer| erased_serde::deserialize::<u16>(deserializer).map(AnyValue::from),
        );

        assert_eq!(
            json::to_string(&envelope, &registry),
            Err(EnvelopeError::TypeMismatch {
                tag: "u8".into(),
                found: "u8".into(),
            })
        );
    }

    #[test]
    fn optional_value() {
        let registry = TypeRegistry::new();

        assert_eq!(Envelope::from_optional(None, &registry), Ok(None));

        let envelope = Envelope::from_optional(Some(AnyValue::from(1_u32)), &registry)
            .unwrap()
            .unwrap();
        assert_eq!(envelope.type_tag(), "u32");
    }

    #[test]
    fn field_order_and_shape() {
        let registry = TypeRegistry::new();

        let duplicate = r#"{"typeName":"i64","value":1,"typeName":"i64"}"#;
        assert!(matches!(
            json::from_str(duplicate, &registry),
            Err(EnvelopeError::Format(_))
        ));

        let unknown = r#"{"typeName":"i64","value":1,"extra":0}"#;
        assert!(matches!(
            json::from_str(unknown, &registry),
            Err(EnvelopeError::Format(_))
        ));

        let missing = r#"{"typeName":"i64"}"#;
        assert!(matches!(
            json::from_str(missing, &registry),
            Err(EnvelopeError::Format(_))
        ));

        let sequence = r#"["i64",1]"#;
        let envelope = json::from_str(sequence, &registry).unwrap();
        assert_eq!(envelope.value(), &AnyValue::from(1_i64));
    }

    #[test]
    fn value_before_type_name() {
        let registry = TypeRegistry::new();
        registry.register::<Celsius>();

        let envelope = json::from_str(r#"{"value":1,"typeName":"i64"}"#, &registry).unwrap();
        assert_eq!(envelope.type_tag(), "i64");
        assert_eq!(envelope.value(), &AnyValue::from(1_i64));

        let envelope = json::from_str(r#"{"value":36.6,"typeName":"tests::Celsius"}"#, &registry).unwrap();
        assert_eq!(envelope.value().downcast_ref::<Celsius>(), Some(&Celsius(36.6)));

        let text = r#"{"value":[
            {"value":"a","typeName":"String"},
            {"typeName":"Set","value":[{"value":2,"typeName":"u8"}]}
        ],"typeName":"Array"}"#;
        let envelope = json::from_str(text, &registry).unwrap();
        let set = AnySet::try_from_values([2_u8]).unwrap();
        assert_eq!(
            envelope.into_value(),
            AnyValue::list([AnyValue::from("a"), AnyValue::Set(set)])
        );

        assert_eq!(
            json::from_str(r#"{"value":1,"typeName":"tests::Missing"}"#, &registry),
            Err(EnvelopeError::UnregisteredTypeDecode("tests::Missing".into()))
        );
    }

    #[test]
    fn encode_with_unused_registry() {
        let building = TypeRegistry::new();
        let envelope = Envelope::new(AnyValue::list([AnyValue::from(5_i64)]), &building).unwrap();

        let fresh = TypeRegistry::new();
        assert_eq!(
            json::to_string(&envelope, &fresh).unwrap(),
            r#"{"typeName":"Array","value":[{"typeName":"i64","value":5}]}"#
        );
        assert!(fresh.contains("i64"));
    }

    #[test]
    fn depth_limit() {
        let registry = TypeRegistry::with_config(EnvelopeConfig::new().max_depth(3));

        let shallow = AnyValue::list([AnyValue::list([1_i32])]);
        assert!(json::to_string(&Envelope::new(shallow, &registry).unwrap(), &registry).is_ok());

        let deep = AnyValue::list([AnyValue::list([AnyValue::list([1_i32])])]);
        assert_eq!(
            json::to_string(&Envelope::new(deep, &registry).unwrap(), &registry),
            Err(EnvelopeError::DepthLimitExceeded(3))
        );

        let mut text = String::from(r#"{"typeName":"i64","value":1}"#);
        for _ in 0..3 {
            text = ["{\"typeName\":\"Array\",\"value\":[", &text, "]}"].concat();
        }
        assert_eq!(
            json::from_str(&text, &registry),
            Err(EnvelopeError::DepthLimitExceeded(3))
        );
    }

    #[test]
    fn ron_round_trip() {
        let registry = TypeRegistry::new();
        registry.register_hashable::<UserId>();

        let set = AnySet::try_from_values([AnyValue::hashable(UserId(7))]).unwrap();
        let envelope = Envelope::new(AnyValue::list([AnyValue::Set(set)]), &registry).unwrap();

        let text = ron::to_string(&envelope.serialize_with(&registry)).unwrap();
        assert_eq!(
            text,
            r#"(typeName:"Array",value:[(typeName:"Set",value:[(typeName:"tests::UserId",value:(7))])])"#
        );

        let mut de = ron::Deserializer::from_str(&text).unwrap();
        let decoded = Envelope::decode(&registry, &mut de).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn format_errors_are_wrapped() {
        let registry = TypeRegistry::new();

        let err = json::from_str(r#"{"typeName":"i64","value":"x"}"#, &registry).unwrap_err();
        assert!(matches!(err, EnvelopeError::Format(_)));

        let messages: Vec<String> = ["", "{", "[]"]
            .into_iter()
            .map(|text| json::from_str(text, &registry).unwrap_err().to_string())
            .collect();
        assert!(messages.iter().all(|message| message.starts_with("Data format error")));
    }
}
