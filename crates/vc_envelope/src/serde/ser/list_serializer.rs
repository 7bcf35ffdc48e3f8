use serde_core::{Serialize, Serializer, ser::SerializeSeq};

use super::EnvelopeRef;

use crate::AnyValue;
use crate::serde::scope::Scope;

/// A serializer for [`AnyValue::List`] payloads.
pub(super) struct ListSerializer<'a> {
    pub items: &'a [AnyValue],
    pub scope: Scope<'a>,
}

impl Serialize for ListSerializer<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_seq(Some(self.items.len()))?;
        for value in self.items {
            state.serialize_element(&EnvelopeRef::element(value, self.scope))?;
        }
        state.end()
    }
}
