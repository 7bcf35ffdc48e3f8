use alloc::boxed::Box;
use core::any::Any;
use core::fmt::{self, Debug, Formatter};
use core::hash::{Hash, Hasher};

use crate::tag::TypeTag;

// -----------------------------------------------------------------------------
// DynValue

/// Object-safe view of an application value stored in
/// [`AnyValue::Opaque`](crate::AnyValue::Opaque).
///
/// Values are boxed through [`AnyValue::opaque`](crate::AnyValue::opaque) or
/// [`AnyValue::hashable`](crate::AnyValue::hashable), which pick an
/// implementation with or without hashing support. Implementing this trait
/// by hand is possible but rarely needed.
pub trait DynValue: Any + Send + Sync + Debug {
    /// The [`TypeTag`] of the concrete type.
    fn value_tag(&self) -> &'static str;

    /// Returns the concrete value as [`Any`].
    fn as_any(&self) -> &dyn Any;

    /// Converts the boxed value into `Box<dyn Any>` holding the concrete value.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Clones the value into a new box.
    fn clone_value(&self) -> Box<dyn DynValue>;

    /// Compares with another value of any concrete type.
    fn eq_value(&self, other: &dyn DynValue) -> bool;

    /// Whether the value can be a set element or a map key.
    fn is_hashable(&self) -> bool;

    /// Feeds the value into `state`.
    ///
    /// Non-hashable values write nothing.
    fn hash_value(&self, state: &mut dyn Hasher);
}

impl PartialEq for dyn DynValue {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.eq_value(other)
    }
}

impl Clone for Box<dyn DynValue> {
    #[inline]
    fn clone(&self) -> Self {
        self.clone_value()
    }
}

// -----------------------------------------------------------------------------
// Implementations

/// An opaque value without hashing support.
pub(crate) struct Plain<T>(pub T);

/// An opaque value that can be a set element or a map key.
pub(crate) struct Hashable<T>(pub T);

impl<T: Debug> Debug for Plain<T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: Debug> Debug for Hashable<T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

macro_rules! impl_dyn_value_common {
    ($wrapper:ident) => {
        #[inline]
        fn value_tag(&self) -> &'static str {
            T::type_tag()
        }

        #[inline]
        fn as_any(&self) -> &dyn Any {
            &self.0
        }

        #[inline]
        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            Box::new(self.0)
        }

        #[inline]
        fn clone_value(&self) -> Box<dyn DynValue> {
            Box::new($wrapper(self.0.clone()))
        }

        fn eq_value(&self, other: &dyn DynValue) -> bool {
            other
                .as_any()
                .downcast_ref::<T>()
                .is_some_and(|other| self.0 == *other)
        }
    };
}

impl<T> DynValue for Plain<T>
where
    T: TypeTag + Clone + PartialEq + Debug + Send + Sync + 'static,
{
    impl_dyn_value_common!(Plain);

    #[inline]
    fn is_hashable(&self) -> bool {
        false
    }

    #[inline]
    fn hash_value(&self, _state: &mut dyn Hasher) {}
}

impl<T> DynValue for Hashable<T>
where
    T: TypeTag + Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    impl_dyn_value_common!(Hashable);

    #[inline]
    fn is_hashable(&self) -> bool {
        true
    }

    #[inline]
    fn hash_value(&self, mut state: &mut dyn Hasher) {
        self.0.hash(&mut state);
    }
}
