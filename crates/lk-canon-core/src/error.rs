//! Error types for lk-canon

use std::fmt;
use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Commitment error types
#[derive(Debug, Error)]
pub enum Error {
    /// The record handed to the committer is not a mapping
    #[error("invalid record shape: expected a mapping at the top level, found {found}")]
    InvalidRecordShape { found: &'static str },

    /// The value tree has no canonical form
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// The hash primitive failed to produce a digest
    #[error("hash failure ({algorithm}): {reason}")]
    HashFailure {
        algorithm: &'static str,
        reason: String,
    },

    /// Hash mismatch (computed != expected digest)
    #[error("hash mismatch: computed {computed} != expected {expected}")]
    HashMismatch { computed: String, expected: String },

    /// A digest string could not be parsed
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// A serde `Serialize` impl reported its own error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serialization(msg.to_string())
    }
}

/// A value that cannot be represented in canonical form.
///
/// `path` locates the offending node, rooted at `$` (for example `$.a[2].z`).
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CanonicalizationError {
    /// A number with a fractional part, or one that is not finite
    #[error("non-integer number {value} at {path}")]
    NonIntegerNumber { value: f64, path: String },

    /// A shape outside the closed value model
    #[error("unsupported type {type_name} at {path}")]
    UnsupportedType { type_name: String, path: String },

    /// Containers nested deeper than the encoder allows
    #[error("nesting depth exceeds limit of {limit} at {path}")]
    DepthExceeded { limit: usize, path: String },
}

/// Discriminant of a [`CanonicalizationError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CanonicalizationErrorKind {
    NonIntegerNumber,
    UnsupportedType,
    DepthExceeded,
}

impl CanonicalizationError {
    /// Which rule was violated
    pub fn kind(&self) -> CanonicalizationErrorKind {
        match self {
            CanonicalizationError::NonIntegerNumber { .. } => {
                CanonicalizationErrorKind::NonIntegerNumber
            }
            CanonicalizationError::UnsupportedType { .. } => {
                CanonicalizationErrorKind::UnsupportedType
            }
            CanonicalizationError::DepthExceeded { .. } => CanonicalizationErrorKind::DepthExceeded,
        }
    }

    /// Location of the offending node
    pub fn path(&self) -> &str {
        match self {
            CanonicalizationError::NonIntegerNumber { path, .. }
            | CanonicalizationError::UnsupportedType { path, .. }
            | CanonicalizationError::DepthExceeded { path, .. } => path,
        }
    }
}

impl fmt::Display for CanonicalizationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CanonicalizationErrorKind::NonIntegerNumber => "NonIntegerNumber",
            CanonicalizationErrorKind::UnsupportedType => "UnsupportedType",
            CanonicalizationErrorKind::DepthExceeded => "DepthExceeded",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Canonicalization kind, when this error came from the encoder
    pub fn canonicalization_kind(&self) -> Option<CanonicalizationErrorKind> {
        match self {
            Error::Canonicalization(e) => Some(e.kind()),
            _ => None,
        }
    }
}
