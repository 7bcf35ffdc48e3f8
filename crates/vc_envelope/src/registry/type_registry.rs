use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt::{self, Debug, Formatter};
use core::hash::Hash;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

use super::bootstrap::register_basic_types;
use super::{Codec, DecodeFn, EncodeFn, ValueCodec};
use crate::config::EnvelopeConfig;
use crate::tag::TypeTag;
use crate::value::{FixedHashState, HashMap};

// -----------------------------------------------------------------------------
// TypeRegistry

/// A thread-safe table from type tags to codecs.
///
/// Envelopes look up the codec of their tag on every encode and decode, so
/// a registry must outlive the envelopes using it, but registrations may
/// happen at any time from any thread.
///
/// The built-in scalars and containers are registered lazily, see
/// [`ensure_basic_types_registered`](Self::ensure_basic_types_registered).
///
/// # Examples
///
/// ```
/// use vc_envelope::{AnyValue, Envelope, TypeRegistry, TypeTag, json};
///
/// #[derive(TypeTag, Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
/// #[type_tag = "demo::Point"]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// static REGISTRY: TypeRegistry = TypeRegistry::new();
///
/// REGISTRY.register::<Point>();
///
/// let envelope = Envelope::new(AnyValue::opaque(Point { x: 1, y: 2 }), &REGISTRY).unwrap();
/// let text = json::to_string(&envelope, &REGISTRY).unwrap();
/// assert_eq!(text, r#"{"typeName":"demo::Point","value":{"x":1,"y":2}}"#);
///
/// let decoded = json::from_str(&text, &REGISTRY).unwrap();
/// assert_eq!(decoded.value().downcast_ref::<Point>(), Some(&Point { x: 1, y: 2 }));
/// ```
pub struct TypeRegistry {
    codecs: RwLock<HashMap<Cow<'static, str>, Codec>>,
    bootstrapped: AtomicBool,
    config: EnvelopeConfig,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry with the default [`EnvelopeConfig`].
    ///
    /// No codec is registered until the first use.
    #[inline]
    pub const fn new() -> Self {
        Self::with_config(EnvelopeConfig::new())
    }

    /// Creates a registry with a custom [`EnvelopeConfig`].
    #[inline]
    pub const fn with_config(config: EnvelopeConfig) -> Self {
        Self {
            codecs: RwLock::new(HashMap::with_hasher(FixedHashState)),
            bootstrapped: AtomicBool::new(false),
            config,
        }
    }

    /// Returns the config shared by every envelope operation of this registry.
    #[inline]
    pub const fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    #[inline]
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Cow<'static, str>, Codec>> {
        self.codecs.read().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Cow<'static, str>, Codec>> {
        self.codecs.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers the built-in scalar and container codecs.
    ///
    /// Runs once per registry, later calls return immediately. Safe to call
    /// from many threads at once, and never overwrites an entry registered
    /// by a client.
    ///
    /// Called implicitly by envelope construction, every codec lookup and
    /// every registration method.
    pub fn ensure_basic_types_registered(&self) {
        if self.bootstrapped.load(Ordering::Acquire) {
            return;
        }

        let mut codecs = self.write();
        // Another thread may have finished while we waited for the lock.
        if self.bootstrapped.load(Ordering::Acquire) {
            return;
        }

        register_basic_types(&mut codecs);
        self.bootstrapped.store(true, Ordering::Release);

        log::trace!("registered {} basic envelope codecs", codecs.len());
    }

    // - If the tag already exists, the codec is replaced (last write wins).
    fn insert_codec(&self, tag: Cow<'static, str>, codec: Codec) {
        self.ensure_basic_types_registered();

        let mut codecs = self.write();
        if codecs.contains_key(&*tag) {
            log::debug!("overwrite envelope codec of `{tag}`");
        } else {
            log::debug!("register envelope codec of `{tag}`");
        }
        codecs.insert(tag, codec);
    }

    /// Registers an application type under its [`TypeTag`].
    ///
    /// Values of `T` decode as non-hashable [`AnyValue::Opaque`] values,
    /// use [`register_hashable`](Self::register_hashable) for types that
    /// appear in sets or as map keys.
    ///
    /// Registering the same tag again replaces the previous codec.
    ///
    /// [`AnyValue::Opaque`]: crate::AnyValue::Opaque
    pub fn register<T>(&self)
    where
        T: TypeTag + Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static,
    {
        self.insert_codec(
            Cow::Borrowed(T::type_tag()),
            Codec::Value(ValueCodec::of::<T>()),
        );
    }

    /// Registers an application type that can be a set element or a map key.
    ///
    /// See [`register`](Self::register).
    pub fn register_hashable<T>(&self)
    where
        T: TypeTag + Serialize + DeserializeOwned + Clone + Eq + Hash + Debug + Send + Sync + 'static,
    {
        self.insert_codec(
            Cow::Borrowed(T::type_tag()),
            Codec::Value(ValueCodec::of_hashable::<T>()),
        );
    }

    /// Registers a pair of function pointers under an arbitrary tag.
    ///
    /// No validation is performed, registering an existing tag silently
    /// replaces its codec.
    pub fn register_codec(
        &self,
        tag: impl Into<Cow<'static, str>>,
        encode: EncodeFn,
        decode: DecodeFn,
    ) {
        self.insert_codec(tag.into(), Codec::Value(ValueCodec::new(encode, decode)));
    }

    /// Removes the codec of a tag, returning whether it existed.
    ///
    /// Envelopes already built with this tag fail to encode afterwards.
    pub fn unregister(&self, tag: &str) -> bool {
        self.ensure_basic_types_registered();

        let removed = self.write().remove(tag).is_some();
        if removed {
            log::debug!("unregister envelope codec of `{tag}`");
        }
        removed
    }

    /// Returns the codec of a tag, bootstrapping the registry if needed.
    ///
    /// The codec is copied out, no lock is held afterwards.
    #[inline]
    pub fn codec(&self, tag: &str) -> Option<Codec> {
        self.ensure_basic_types_registered();
        self.read().get(tag).copied()
    }

    /// Returns the codec used to encode payloads of a tag.
    ///
    /// A single entry serves both directions, this is [`codec`](Self::codec).
    #[inline]
    pub fn lookup_encode(&self, tag: &str) -> Option<Codec> {
        self.codec(tag)
    }

    /// Returns the codec used to decode payloads of a tag.
    ///
    /// A single entry serves both directions, this is [`codec`](Self::codec).
    #[inline]
    pub fn lookup_decode(&self, tag: &str) -> Option<Codec> {
        self.codec(tag)
    }

    /// Returns `true` if the tag has a codec.
    ///
    /// Does not trigger the bootstrap.
    #[inline]
    pub fn contains(&self, tag: &str) -> bool {
        self.read().contains_key(tag)
    }

    /// Returns the number of registered tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if nothing is registered yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a snapshot of the registered tags, in arbitrary order.
    pub fn tags(&self) -> Vec<Cow<'static, str>> {
        self.read().keys().cloned().collect()
    }
}

impl Debug for TypeRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("tags", &self.read().keys())
            .field("config", &self.config)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(all(test, feature = "json"))]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::TypeRegistry;
    use crate::registry::Codec;
    use crate::tag::ContainerKind;
    use crate::{AnyValue, Envelope, EnvelopeError, json};

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Celsius(f64);

    crate::impl_type_tag!(Celsius => "tests::Celsius");

    #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    struct UserId(u32);

    crate::impl_type_tag!(UserId => "tests::UserId");

    #[test]
    fn lazy_bootstrap() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("i64"));

        registry.ensure_basic_types_registered();
        registry.ensure_basic_types_registered();

        assert_eq!(registry.len(), 23);
        assert!(registry.contains("i64"));
        assert!(matches!(
            registry.codec("Array"),
            Some(Codec::Container(ContainerKind::List))
        ));
    }

    #[test]
    fn registration_triggers_bootstrap() {
        let registry = TypeRegistry::new();
        registry.register::<Celsius>();

        assert_eq!(registry.len(), 24);
        assert!(registry.contains("String"));
        assert!(registry.contains("tests::Celsius"));
        assert!(registry.lookup_encode("tests::Celsius").is_some());
        assert!(registry.lookup_decode("tests::Missing").is_none());
    }

    #[test]
    fn overwrite_keeps_last() {
        let registry = TypeRegistry::new();
        registry.register::<UserId>();
        registry.register_hashable::<UserId>();
        assert_eq!(registry.len(), 24);

        let decoded = json::from_str(r#"{"typeName":"tests::UserId","value":5}"#, &registry).unwrap();
        assert!(decoded.value().is_hashable());
    }

    #[test]
    fn unregister_affects_existing_envelopes() {
        let registry = TypeRegistry::new();
        registry.register::<Celsius>();

        let envelope = Envelope::new(AnyValue::opaque(Celsius(3.0)), &registry).unwrap();
        assert!(registry.unregister("tests::Celsius"));
        assert!(!registry.unregister("tests::Celsius"));

        assert_eq!(
            json::to_string(&envelope, &registry),
            Err(EnvelopeError::UnregisteredTypeEncode("tests::Celsius".into()))
        );
    }

    #[test]
    fn tags_snapshot() {
        let registry = TypeRegistry::new();
        registry.register::<Celsius>();

        let mut tags: Vec<String> = registry.tags().into_iter().map(Into::into).collect();
        tags.sort();
        assert!(tags.binary_search(&String::from("tests::Celsius")).is_ok());
        assert!(tags.binary_search(&String::from("Dictionary")).is_ok());
    }

    fn encode_u8(value: &AnyValue) -> Option<&dyn erased_serde::Serialize> {
        value
            .downcast_ref::<u8>()
            .map(|value| value as &dyn erased_serde::Serialize)
    }

    fn decode_u8(
        deserializer: &mut dyn erased_serde::Deserializer<'_>,
    ) -> Result<AnyValue, erased_serde::Error> {
        erased_serde::deserialize::<u8>(deserializer).map(AnyValue::from)
    }

    #[test]
    fn lookup_bootstraps_fresh_registry() {
        let registry = TypeRegistry::new();
        assert!(!registry.contains("i64"));

        assert!(registry.lookup_encode("i64").is_some());
        assert!(registry.lookup_decode("Dictionary").is_some());
        assert_eq!(registry.len(), 23);
    }

    #[test]
    fn concurrent_registration_and_use() {
        const WRITERS: usize = 4;
        const PER_WRITER: usize = 100;

        let registry = TypeRegistry::new();

        std::thread::scope(|scope| {
            for writer in 0..WRITERS {
                let registry = &registry;
                scope.spawn(move || {
                    for index in 0..PER_WRITER {
                        registry.register_codec(format!("t{writer}_{index}"), encode_u8, decode_u8);
                    }
                });
            }

            for _ in 0..4 {
                scope.spawn(|| {
                    for index in 0..100_i64 {
                        let envelope = Envelope::new(AnyValue::from(index), &registry).unwrap();
                        let text = json::to_string(&envelope, &registry).unwrap();
                        let decoded = json::from_str(&text, &registry).unwrap();
                        assert_eq!(decoded, envelope);
                    }
                });
            }
        });

        assert_eq!(registry.len(), 23 + WRITERS * PER_WRITER);
        for writer in 0..WRITERS {
            for index in 0..PER_WRITER {
                let tag = format!("t{writer}_{index}");
                assert!(matches!(registry.codec(&tag), Some(Codec::Value(_))));

                let text = format!(r#"{{"typeName":"{tag}","value":7}}"#);
                let decoded = json::from_str(&text, &registry).unwrap();
                assert_eq!(decoded.type_tag(), tag);
                assert_eq!(decoded.value(), &AnyValue::from(7_u8));
            }
        }
    }
}
