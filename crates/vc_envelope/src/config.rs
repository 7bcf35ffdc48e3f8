/// Default value of [`EnvelopeConfig::max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Runtime options shared by every envelope operation of a registry.
///
/// The config is fixed when the [`TypeRegistry`] is built and reaches
/// encoders and decoders through the registry reference.
///
/// # Examples
///
/// ```
/// use vc_envelope::{EnvelopeConfig, TypeRegistry};
///
/// let registry = TypeRegistry::with_config(EnvelopeConfig::new().max_depth(8));
/// assert_eq!(registry.config().max_depth, 8);
/// ```
///
/// [`TypeRegistry`]: crate::registry::TypeRegistry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// Maximum number of nested envelopes, the outermost one included.
    ///
    /// Decoding untrusted input recurses once per nesting level,
    /// this bound keeps the stack usage finite.
    pub max_depth: usize,
}

impl EnvelopeConfig {
    /// Creates the default config.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets [`max_depth`](Self::max_depth).
    #[inline]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for EnvelopeConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}
