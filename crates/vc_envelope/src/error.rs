use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// EnvelopeError

/// Errors returned by envelope construction, encoding and decoding.
///
/// Every failure is systemic (bad input or missing registration), so no
/// operation retries internally. Registering the missing type and repeating
/// the identical call is the expected recovery for the two
/// `UnregisteredType*` kinds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvelopeError {
    #[error("Not registered type for encoding: `{0}`")]
    UnregisteredTypeEncode(String),

    #[error("Not registered type for decoding: `{0}`")]
    UnregisteredTypeDecode(String),

    #[error("Expected hashable value, `{0}` is not hashable")]
    NonHashableElement(String),

    #[error("Expected collection of key-value pairs, encountered odd-length sequence instead")]
    MalformedPairs,

    #[error("Sequence reached end before value in key-value pair")]
    TruncatedPair,

    #[error("Codec registered for `{tag}` cannot encode a value of `{found}`")]
    TypeMismatch { tag: String, found: String },

    #[error("Envelope nesting exceeds the depth limit of {0}")]
    DepthLimitExceeded(usize),

    #[error("Data format error: {0}")]
    Format(String),
}

impl EnvelopeError {
    /// Returns `true` for the two kinds caused by a missing registration.
    #[inline]
    pub fn is_unregistered(&self) -> bool {
        matches!(
            self,
            Self::UnregisteredTypeEncode(_) | Self::UnregisteredTypeDecode(_)
        )
    }
}

/// Shorthand used across the crate.
pub type Result<T, E = EnvelopeError> = core::result::Result<T, E>;
