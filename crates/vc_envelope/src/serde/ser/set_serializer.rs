use serde_core::{Serialize, Serializer, ser::SerializeSeq};

use super::EnvelopeRef;

use crate::AnySet;
use crate::serde::scope::Scope;

/// A serializer for [`AnySet`] payloads.
pub(super) struct SetSerializer<'a> {
    pub set: &'a AnySet,
    pub scope: Scope<'a>,
}

impl Serialize for SetSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_seq(Some(self.set.len()))?;
        for value in self.set.iter() {
            state.serialize_element(&EnvelopeRef::element(value, self.scope))?;
        }
        state.end()
    }
}
