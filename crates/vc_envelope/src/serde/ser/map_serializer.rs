use serde_core::{Serialize, Serializer, ser::SerializeSeq};

use super::EnvelopeRef;

use crate::AnyMap;
use crate::serde::scope::Scope;

/// A serializer for [`AnyMap`] payloads.
///
/// Keys are not restricted to strings, so entries are written as one flat
/// sequence alternating key and value envelopes.
pub(super) struct MapSerializer<'a> {
    pub map: &'a AnyMap,
    pub scope: Scope<'a>,
}

impl Serialize for MapSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_seq(Some(self.map.len() * 2))?;
        for (key, value) in self.map.iter() {
            state.serialize_element(&EnvelopeRef::element(key, self.scope))?;
            state.serialize_element(&EnvelopeRef::element(value, self.scope))?;
        }
        state.end()
    }
}
