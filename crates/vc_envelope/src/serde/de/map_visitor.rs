use alloc::string::ToString;
use core::fmt::{self, Formatter};

use serde_core::de::{SeqAccess, Visitor};

use super::{MAX_PREALLOCATION, NestedSeed};

use crate::serde::scope::Scope;
use crate::{AnyMap, EnvelopeError};

/// A [`Visitor`] for deserializing [`AnyMap`] payloads.
///
/// Reads a flat sequence alternating key and value envelopes.
pub(super) struct MapVisitor<'a> {
    pub scope: Scope<'a>,
}

impl<'de> Visitor<'de> for MapVisitor<'_> {
    type Value = AnyMap;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("sequence of alternating key and value envelopes")
    }

    fn visit_seq<V>(self, mut seq: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        // A known length must be even, fail before reading anything.
        let len = seq.size_hint();
        if len.is_some_and(|len| len % 2 != 0) {
            return Err(self.scope.de_error(EnvelopeError::MalformedPairs));
        }

        let capacity = (len.unwrap_or_default() / 2).min(MAX_PREALLOCATION);
        let mut map = AnyMap::with_capacity(capacity);

        while let Some(key) = seq.next_element_seed(NestedSeed { scope: self.scope })? {
            let key = key.into_value();
            if !key.is_hashable() {
                return Err(self.scope.de_error(EnvelopeError::NonHashableElement(
                    key.type_tag().to_string(),
                )));
            }

            let Some(value) = seq.next_element_seed(NestedSeed { scope: self.scope })? else {
                return Err(self.scope.de_error(EnvelopeError::TruncatedPair));
            };

            map.insert(key, value.into_value())
                .map_err(|err| self.scope.de_error::<V::Error>(err))?;
        }

        Ok(map)
    }
}
