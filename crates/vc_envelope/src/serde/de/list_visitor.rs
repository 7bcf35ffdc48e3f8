use alloc::vec::Vec;
use core::fmt::{self, Formatter};

use serde_core::de::{SeqAccess, Visitor};

use super::{MAX_PREALLOCATION, NestedSeed};

use crate::AnyValue;
use crate::serde::scope::Scope;

/// A [`Visitor`] for deserializing [`AnyValue::List`] payloads.
pub(super) struct ListVisitor<'a> {
    pub scope: Scope<'a>,
}

impl<'de> Visitor<'de> for ListVisitor<'_> {
    type Value = Vec<AnyValue>;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("sequence of envelopes")
    }

    fn visit_seq<V>(self, mut seq: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let capacity = seq.size_hint().unwrap_or_default().min(MAX_PREALLOCATION);
        let mut items = Vec::with_capacity(capacity);

        while let Some(envelope) = seq.next_element_seed(NestedSeed { scope: self.scope })? {
            items.push(envelope.into_value());
        }

        Ok(items)
    }
}
