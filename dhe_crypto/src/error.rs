//! Error types for parameter generation, key agreement and encoding.

use std::time::Duration;
use thiserror::Error;

/// Result type for the key-exchange core
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to produce a set of domain parameters.
#[derive(Error, Debug)]
pub enum ParameterGenerationError {
    /// Requested modulus size is below the safety floor
    #[error("requested modulus of {requested} bits is below the {floor}-bit safety floor")]
    BelowSafetyFloor { requested: u64, floor: u64 },

    /// The random source could not supply bytes
    #[error("random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),

    /// The configured deadline expired before a modulus was accepted
    #[error("parameter generation timed out after {0:?}")]
    OperationTimedOut(Duration),
}

/// A peer-supplied public value that must not be used to derive a secret.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPeerKeyError {
    /// Value is zero or not below the modulus
    #[error("peer public key is outside (0, p)")]
    OutOfRange,

    /// Value is 1, p-1, or forces a degenerate shared secret
    #[error("peer public key is a low-order element")]
    LowOrder,

    /// Value is not a member of the prime-order subgroup
    #[error("peer public key is not in the prime-order subgroup")]
    OutsideSubgroup,
}

/// Domain parameters that fail their basic invariants.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidConfigurationError {
    /// Modulus leaves no room for a private exponent in [2, p-2]
    #[error("modulus must be at least 5")]
    ModulusTooSmall,

    /// Modulus is even and so cannot be an odd prime
    #[error("modulus must be odd")]
    ModulusEven,

    /// Generator outside (1, p-1)
    #[error("generator must lie in the range (1, p-1)")]
    GeneratorOutOfRange,

    /// Declared subgroup order does not annihilate the generator
    #[error("generator does not have the declared subgroup order")]
    SubgroupOrderMismatch,
}

/// Malformed byte encodings of big integers or parameter sets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Input ended before a complete field was read
    #[error("input truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// Fixed-width field with the wrong length
    #[error("expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Value does not fit into the requested width
    #[error("value needs {needed} bytes but width is {width}")]
    ValueTooLarge { needed: usize, width: usize },

    /// Bytes left over after a complete structure
    #[error("{0} trailing bytes after encoded value")]
    TrailingBytes(usize),
}

/// Error type for the key-exchange core
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ParameterGeneration(#[from] ParameterGenerationError),

    #[error(transparent)]
    InvalidPeerKey(#[from] InvalidPeerKeyError),

    #[error(transparent)]
    InvalidConfiguration(#[from] InvalidConfigurationError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// Random source failed while drawing key material
    #[error("random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),
}

impl Error {
    /// True when the error came from a deadline expiring.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::ParameterGeneration(ParameterGenerationError::OperationTimedOut(_))
        )
    }
}
