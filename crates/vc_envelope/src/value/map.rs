use alloc::string::ToString;
use core::fmt::{self, Debug, Formatter};

use super::AnyValue;
use super::hash::{FixedHashState, HashMap};
use crate::error::{EnvelopeError, Result};

// -----------------------------------------------------------------------------
// AnyMap

/// A mapping from hashable [`AnyValue`] keys to [`AnyValue`]s.
///
/// Insertion order is irrelevant and inserting an existing key replaces the
/// previous value.
///
/// # Examples
///
/// ```
/// use vc_envelope::{AnyMap, AnyValue};
///
/// let mut map = AnyMap::new();
/// map.insert("a".into(), 1_i64.into()).unwrap();
/// map.insert("b".into(), 2_i64.into()).unwrap();
///
/// let old = map.insert("a".into(), 3_i64.into()).unwrap();
/// assert_eq!(old, Some(AnyValue::from(1_i64)));
/// assert_eq!(map.get(&"a".into()), Some(&AnyValue::from(3_i64)));
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AnyMap {
    inner: HashMap<AnyValue, AnyValue>,
}

impl AnyMap {
    /// Creates an empty map.
    #[inline]
    pub const fn new() -> Self {
        Self {
            inner: HashMap::with_hasher(FixedHashState),
        }
    }

    /// Creates an empty map with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity_and_hasher(capacity, FixedHashState),
        }
    }

    /// Builds a map from pairs, failing on the first non-hashable key.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<AnyValue>,
        V: Into<AnyValue>,
    {
        let mut map = Self::new();
        for (key, value) in pairs {
            map.insert(key.into(), value.into())?;
        }
        Ok(map)
    }

    /// Inserts a key-value pair, returning the replaced value if any.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::NonHashableElement`] if the key is not hashable.
    pub fn insert(&mut self, key: AnyValue, value: AnyValue) -> Result<Option<AnyValue>> {
        if !key.is_hashable() {
            return Err(EnvelopeError::NonHashableElement(
                key.type_tag().to_string(),
            ));
        }
        Ok(self.inner.insert(key, value))
    }

    /// Returns the value of the key.
    #[inline]
    pub fn get(&self, key: &AnyValue) -> Option<&AnyValue> {
        self.inner.get(key)
    }

    /// Returns `true` if the map contains the key.
    #[inline]
    pub fn contains_key(&self, key: &AnyValue) -> bool {
        self.inner.contains_key(key)
    }

    /// Removes a key, returning its value if it was present.
    #[inline]
    pub fn remove(&mut self, key: &AnyValue) -> Option<AnyValue> {
        self.inner.remove(key)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// An iterator visiting all entries in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&AnyValue, &AnyValue)> {
        self.inner.iter()
    }

    /// An iterator visiting all keys in arbitrary order.
    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &AnyValue> {
        self.inner.keys()
    }

    /// An iterator visiting all values in arbitrary order.
    #[inline]
    pub fn values(&self) -> impl ExactSizeIterator<Item = &AnyValue> {
        self.inner.values()
    }
}

impl Debug for AnyMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.inner.iter()).finish()
    }
}

impl IntoIterator for AnyMap {
    type Item = (AnyValue, AnyValue);
    type IntoIter = hashbrown::hash_map::IntoIter<AnyValue, AnyValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnyMap {
    type Item = (&'a AnyValue, &'a AnyValue);
    type IntoIter = hashbrown::hash_map::Iter<'a, AnyValue, AnyValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
