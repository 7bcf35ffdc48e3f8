use alloc::string::String;
use core::fmt::{self, Formatter};

use serde_core::Deserializer;
use serde_core::de::{DeserializeSeed, Error, MapAccess, SeqAccess, Visitor};

use super::field::Field;
use super::list_visitor::ListVisitor;
use super::map_visitor::MapVisitor;
use super::set_visitor::SetVisitor;

use crate::registry::{Codec, TypeRegistry};
use crate::serde::scope::{Failure, Scope, clear_tags, with_tag};
use crate::serde::{ENVELOPE_NAME, FIELDS, TYPE_NAME_FIELD, VALUE_FIELD};
use crate::tag::ContainerKind;
use crate::{AnyValue, Envelope, EnvelopeError};

// -----------------------------------------------------------------------------
// EnvelopeSeed

/// Deserializer for an [`Envelope`] and all envelopes nested in its payload.
///
/// This is the counterpart of [`EnvelopeSerializer`]. The registry is
/// bootstrapped before reading, and an unknown `typeName` is an error,
/// never a panic.
///
/// # Input
///
/// A struct with the `typeName` and `value` fields. Keyed formats may list
/// them in either order, a `value` read first is buffered until its codec
/// is known. Unknown and duplicate fields are rejected.
///
/// # Examples
///
/// ```
/// # use serde_core::de::DeserializeSeed;
/// # use vc_envelope::{AnyValue, TypeRegistry, serde::EnvelopeSeed};
/// let registry = TypeRegistry::new();
///
/// let input = r#"(typeName: "Array", value: [
///     (typeName: "String", value: "123"),
///     (typeName: "i64", value: 123),
/// ])"#;
///
/// let mut data = ron::Deserializer::from_str(input).unwrap();
/// let envelope = EnvelopeSeed::new(&registry).deserialize(&mut data).unwrap();
///
/// assert_eq!(envelope.type_tag(), "Array");
/// assert_eq!(
///     envelope.into_value(),
///     AnyValue::list([AnyValue::from("123"), AnyValue::from(123_i64)]),
/// );
/// ```
///
/// [`EnvelopeSerializer`]: crate::serde::EnvelopeSerializer
#[derive(Clone, Copy)]
pub struct EnvelopeSeed<'a> {
    registry: &'a TypeRegistry,
    failure: Option<&'a Failure>,
}

impl<'a> EnvelopeSeed<'a> {
    /// Creates a deserializer.
    #[inline]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            failure: None,
        }
    }

    /// Creates a deserializer recording typed errors into `failure`.
    #[inline]
    pub(crate) const fn with_failure(registry: &'a TypeRegistry, failure: &'a Failure) -> Self {
        Self {
            registry,
            failure: Some(failure),
        }
    }
}

impl<'de> DeserializeSeed<'de> for EnvelopeSeed<'_> {
    type Value = Envelope;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        self.registry.ensure_basic_types_registered();
        clear_tags();

        NestedSeed {
            scope: Scope::root(self.registry, self.failure),
        }
        .deserialize(deserializer)
    }
}

// -----------------------------------------------------------------------------
// NestedSeed

/// Reads one envelope, used for the root and for every nested element.
pub(in crate::serde) struct NestedSeed<'a> {
    pub scope: Scope<'a>,
}

impl<'de> DeserializeSeed<'de> for NestedSeed<'_> {
    type Value = Envelope;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let scope = self
            .scope
            .enter()
            .map_err(|err| self.scope.de_error::<D::Error>(err))?;

        deserializer.deserialize_struct(ENVELOPE_NAME, FIELDS, EnvelopeVisitor { scope })
    }
}

struct EnvelopeVisitor<'a> {
    scope: Scope<'a>,
}

impl EnvelopeVisitor<'_> {
    fn lookup<E: Error>(&self, tag: &str) -> Result<Codec, E> {
        self.scope
            .registry
            .codec(tag)
            .ok_or_else(|| self.scope.de_error(EnvelopeError::UnregisteredTypeDecode(tag.into())))
    }
}

impl<'de> Visitor<'de> for EnvelopeVisitor<'_> {
    type Value = Envelope;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("envelope with `typeName` and `value`")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let tag: String = seq
            .next_element()?
            .ok_or_else(|| A::Error::invalid_length(0, &self))?;

        let codec = self.lookup::<A::Error>(&tag)?;

        let value = seq
            .next_element_seed(PayloadSeed {
                codec,
                tag: &tag,
                scope: self.scope,
            })?
            .ok_or_else(|| A::Error::invalid_length(1, &self))?;

        Ok(Envelope::from_parts(tag, value))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut head: Option<(String, Codec)> = None;
        let mut value: Option<AnyValue> = None;
        // `value` read before `typeName`, decoded once the codec is known.
        let mut buffered: Option<serde_value::Value> = None;

        while let Some(field) = map.next_key::<Field>()? {
            match field {
                Field::TypeName => {
                    if head.is_some() {
                        return Err(Error::duplicate_field(field.name()));
                    }
                    let tag: String = map.next_value()?;
                    let codec = self.lookup::<A::Error>(&tag)?;
                    head = Some((tag, codec));
                }
                Field::Value => {
                    if value.is_some() || buffered.is_some() {
                        return Err(Error::duplicate_field(field.name()));
                    }
                    match &head {
                        Some((tag, codec)) => {
                            value = Some(map.next_value_seed(PayloadSeed {
                                codec: *codec,
                                tag,
                                scope: self.scope,
                            })?);
                        }
                        None => buffered = Some(map.next_value()?),
                    }
                }
            }
        }

        let Some((tag, codec)) = head else {
            return Err(Error::missing_field(TYPE_NAME_FIELD));
        };

        let value = match (value, buffered) {
            (Some(value), _) => value,
            (None, Some(buffered)) => PayloadSeed {
                codec,
                tag: &tag,
                scope: self.scope,
            }
            .deserialize(buffered)
            .map_err(A::Error::custom)?,
            (None, None) => return Err(Error::missing_field(VALUE_FIELD)),
        };

        Ok(Envelope::from_parts(tag, value))
    }
}

// -----------------------------------------------------------------------------
// PayloadSeed

/// Reads the `value` field with the codec found for the tag.
struct PayloadSeed<'a> {
    codec: Codec,
    tag: &'a str,
    scope: Scope<'a>,
}

impl<'de> DeserializeSeed<'de> for PayloadSeed<'_> {
    type Value = AnyValue;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        let scope = self.scope;

        with_tag(self.tag, || match self.codec {
            Codec::Value(codec) => codec.decode(deserializer),
            Codec::Container(ContainerKind::List) => deserializer
                .deserialize_seq(ListVisitor { scope })
                .map(AnyValue::List),
            Codec::Container(ContainerKind::Set) => deserializer
                .deserialize_seq(SetVisitor { scope })
                .map(AnyValue::Set),
            Codec::Container(ContainerKind::Map) => deserializer
                .deserialize_seq(MapVisitor { scope })
                .map(AnyValue::Map),
        })
    }
}
