use core::fmt::{self, Formatter};

use serde_core::de::{SeqAccess, Visitor};

use super::{MAX_PREALLOCATION, NestedSeed};

use crate::AnySet;
use crate::serde::scope::Scope;

/// A [`Visitor`] for deserializing [`AnySet`] payloads.
pub(super) struct SetVisitor<'a> {
    pub scope: Scope<'a>,
}

impl<'de> Visitor<'de> for SetVisitor<'_> {
    type Value = AnySet;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("sequence of hashable envelopes")
    }

    fn visit_seq<V>(self, mut seq: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let capacity = seq.size_hint().unwrap_or_default().min(MAX_PREALLOCATION);
        let mut set = AnySet::with_capacity(capacity);

        while let Some(envelope) = seq.next_element_seed(NestedSeed { scope: self.scope })? {
            set.insert(envelope.into_value())
                .map_err(|err| self.scope.de_error::<V::Error>(err))?;
        }

        Ok(set)
    }
}
