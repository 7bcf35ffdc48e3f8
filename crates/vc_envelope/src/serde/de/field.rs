use core::fmt::{self, Formatter};

use serde_core::de::{Error, Unexpected, Visitor};
use serde_core::{Deserialize, Deserializer};

use crate::serde::{FIELDS, TYPE_NAME_FIELD, VALUE_FIELD};

/// A field identifier of the envelope struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Field {
    TypeName,
    Value,
}

impl Field {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TypeName => TYPE_NAME_FIELD,
            Self::Value => VALUE_FIELD,
        }
    }
}

struct FieldVisitor;

impl<'de> Visitor<'de> for FieldVisitor {
    type Value = Field;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("`typeName` or `value`")
    }

    fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
        match value {
            0 => Ok(Field::TypeName),
            1 => Ok(Field::Value),
            _ => Err(E::invalid_value(
                Unexpected::Unsigned(value),
                &"field index 0 <= i < 2",
            )),
        }
    }

    fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
        match value {
            TYPE_NAME_FIELD => Ok(Field::TypeName),
            VALUE_FIELD => Ok(Field::Value),
            _ => Err(E::unknown_field(value, FIELDS)),
        }
    }

    fn visit_bytes<E: Error>(self, value: &[u8]) -> Result<Self::Value, E> {
        match core::str::from_utf8(value) {
            Ok(value) => self.visit_str(value),
            Err(_) => Err(E::invalid_value(Unexpected::Bytes(value), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for Field {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_identifier(FieldVisitor)
    }
}
