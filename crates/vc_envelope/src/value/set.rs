use alloc::string::ToString;
use core::fmt::{self, Debug, Formatter};

use super::AnyValue;
use super::hash::{FixedHashState, HashSet};
use crate::error::{EnvelopeError, Result};

// -----------------------------------------------------------------------------
// AnySet

/// An unordered set of hashable [`AnyValue`]s.
///
/// Insertion rejects non-hashable values, see the
/// [module documentation](crate::value) for the rules.
///
/// # Examples
///
/// ```
/// use vc_envelope::{AnySet, AnyValue, EnvelopeError};
///
/// let mut set = AnySet::new();
/// assert_eq!(set.insert("123".into()), Ok(true));
/// assert_eq!(set.insert(AnyValue::from(123_i64)), Ok(true));
/// assert_eq!(set.insert("123".into()), Ok(false));
///
/// let err = set.insert(AnyValue::Set(AnySet::new())).unwrap_err();
/// assert_eq!(err, EnvelopeError::NonHashableElement("Set".into()));
/// assert_eq!(set.len(), 2);
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AnySet {
    inner: HashSet<AnyValue>,
}

impl AnySet {
    /// Creates an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self {
            inner: HashSet::with_hasher(FixedHashState),
        }
    }

    /// Creates an empty set with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashSet::with_capacity_and_hasher(capacity, FixedHashState),
        }
    }

    /// Builds a set from values, failing on the first non-hashable one.
    pub fn try_from_values<I>(values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<AnyValue>,
    {
        let mut set = Self::new();
        for value in values {
            set.insert(value.into())?;
        }
        Ok(set)
    }

    /// Adds a value to the set.
    ///
    /// Returns whether the value was newly inserted, duplicates collapse.
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::NonHashableElement`] if the value is not hashable.
    pub fn insert(&mut self, value: AnyValue) -> Result<bool> {
        if !value.is_hashable() {
            return Err(EnvelopeError::NonHashableElement(
                value.type_tag().to_string(),
            ));
        }
        Ok(self.inner.insert(value))
    }

    /// Returns `true` if the set contains the value.
    #[inline]
    pub fn contains(&self, value: &AnyValue) -> bool {
        self.inner.contains(value)
    }

    /// Removes a value, returning whether it was present.
    #[inline]
    pub fn remove(&mut self, value: &AnyValue) -> bool {
        self.inner.remove(value)
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// An iterator visiting all elements in arbitrary order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &AnyValue> {
        self.inner.iter()
    }
}

impl Debug for AnySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inner.iter()).finish()
    }
}

impl IntoIterator for AnySet {
    type Item = AnyValue;
    type IntoIter = hashbrown::hash_set::IntoIter<AnyValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a AnySet {
    type Item = &'a AnyValue;
    type IntoIter = hashbrown::hash_set::Iter<'a, AnyValue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
