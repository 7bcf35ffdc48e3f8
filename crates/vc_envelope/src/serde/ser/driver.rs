use serde_core::ser::SerializeStruct;
use serde_core::{Serialize, Serializer};

use super::list_serializer::ListSerializer;
use super::map_serializer::MapSerializer;
use super::set_serializer::SetSerializer;

use crate::serde::scope::{Failure, Scope, clear_tags, with_tag};
use crate::serde::{ENVELOPE_NAME, TYPE_NAME_FIELD, VALUE_FIELD};
use crate::{AnyValue, Envelope, EnvelopeError};
use crate::registry::{Codec, TypeRegistry};
use crate::tag::ContainerKind;

// -----------------------------------------------------------------------------
// EnvelopeSerializer

/// Serializer for an [`Envelope`] and all envelopes nested in its payload.
///
/// The codec of every tag is looked up again at serialization time, so a
/// tag unregistered after construction fails here.
///
/// # Output Format
///
/// ```json
/// { "typeName": "Array", "value": [
///     { "typeName": "String", "value": "123" },
///     { "typeName": "i64", "value": 123 }
/// ] }
/// ```
///
/// # Examples
///
/// ```
/// # use vc_envelope::{AnyValue, Envelope, TypeRegistry, serde::EnvelopeSerializer};
/// let registry = TypeRegistry::new();
/// let envelope = Envelope::new(AnyValue::from(5_u8), &registry).unwrap();
///
/// let serializer = EnvelopeSerializer::new(&envelope, &registry);
/// let output = ron::to_string(&serializer).unwrap();
///
/// assert_eq!(output, r#"(typeName:"u8",value:5)"#);
/// ```
pub struct EnvelopeSerializer<'a> {
    envelope: &'a Envelope,
    registry: &'a TypeRegistry,
    failure: Option<&'a Failure>,
}

impl<'a> EnvelopeSerializer<'a> {
    /// Creates a serializer.
    #[inline]
    pub const fn new(envelope: &'a Envelope, registry: &'a TypeRegistry) -> Self {
        Self {
            envelope,
            registry,
            failure: None,
        }
    }

    /// Creates a serializer recording typed errors into `failure`.
    #[inline]
    pub(crate) const fn with_failure(
        envelope: &'a Envelope,
        registry: &'a TypeRegistry,
        failure: &'a Failure,
    ) -> Self {
        Self {
            envelope,
            registry,
            failure: Some(failure),
        }
    }
}

impl Serialize for EnvelopeSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        clear_tags();

        EnvelopeRef {
            tag: self.envelope.type_tag(),
            value: self.envelope.value(),
            scope: Scope::root(self.registry, self.failure),
        }
        .serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// EnvelopeRef

/// A borrowed envelope, used for the root and for every nested element.
pub(in crate::serde) struct EnvelopeRef<'a> {
    pub tag: &'a str,
    pub value: &'a AnyValue,
    pub scope: Scope<'a>,
}

impl<'a> EnvelopeRef<'a> {
    /// Wraps a container element, tagged like [`Envelope::new`] would.
    #[inline]
    pub fn element(value: &'a AnyValue, scope: Scope<'a>) -> Self {
        Self {
            tag: value.type_tag(),
            value,
            scope,
        }
    }
}

impl Serialize for EnvelopeRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let scope = self
            .scope
            .enter()
            .map_err(|err| self.scope.ser_error::<S::Error>(err))?;

        let Some(codec) = scope.registry.codec(self.tag) else {
            return Err(scope.ser_error(EnvelopeError::UnregisteredTypeEncode(self.tag.into())));
        };

        let mut state = serializer.serialize_struct(ENVELOPE_NAME, 2)?;
        state.serialize_field(TYPE_NAME_FIELD, self.tag)?;
        state.serialize_field(
            VALUE_FIELD,
            &PayloadSerializer {
                codec,
                tag: self.tag,
                value: self.value,
                scope,
            },
        )?;
        state.end()
    }
}

// -----------------------------------------------------------------------------
// PayloadSerializer

/// Serializes the `value` field with the codec found for the tag.
struct PayloadSerializer<'a> {
    codec: Codec,
    tag: &'a str,
    value: &'a AnyValue,
    scope: Scope<'a>,
}

impl PayloadSerializer<'_> {
    fn mismatch<E: serde_core::ser::Error>(&self) -> E {
        self.scope.ser_error(EnvelopeError::TypeMismatch {
            tag: self.tag.into(),
            found: self.value.type_tag().into(),
        })
    }
}

impl Serialize for PayloadSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let scope = self.scope;

        with_tag(self.tag, || match self.codec {
            Codec::Value(codec) => match codec.encode(self.value, serializer) {
                Some(output) => output,
                None => Err(self.mismatch()),
            },
            Codec::Container(kind) => match (kind, self.value) {
                (ContainerKind::List, AnyValue::List(items)) => {
                    ListSerializer { items, scope }.serialize(serializer)
                }
                (ContainerKind::Set, AnyValue::Set(set)) => {
                    SetSerializer { set, scope }.serialize(serializer)
                }
                (ContainerKind::Map, AnyValue::Map(map)) => {
                    MapSerializer { map, scope }.serialize(serializer)
                }
                _ => Err(self.mismatch()),
            },
        })
    }
}
