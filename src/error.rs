//! Error taxonomy for the rate engine
//!
//! Setters validate eagerly and fail before any mutation. `get_rate` never
//! returns an error; see `engine::Rejection` for why a quote is zero.

use rate_model::ModelError;
use thiserror::Error;

use crate::{AssetId, Epoch};

/// Result type for engine operations
pub type Result<T> = core::result::Result<T, RateError>;

/// Broad error classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: lengths, ranges, breakpoints, epochs
    Validation,
    /// Query or update for an asset that is not listed
    NotFound,
    /// Re-registration of a listed asset
    Duplicate,
    /// Encode/decode or multiplication range violation
    Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RateError {
    #[error("asset {0} is already listed")]
    AlreadyListed(AssetId),

    #[error("asset {0} is not listed")]
    NotListed(AssetId),

    #[error("asset {0} has no minimal record resolution")]
    ResolutionNotSet(AssetId),

    #[error("{what}: expected length {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{count} bucket updates but only {buckets} buckets exist")]
    TooManyBuckets { count: usize, buckets: usize },

    #[error("bucket index {index} out of range ({buckets} buckets)")]
    BucketOutOfRange { index: usize, buckets: usize },

    #[error("epoch {0} does not fit in 32 bits")]
    EpochOutOfRange(Epoch),

    #[error("quantity step functions are not available in enhanced mode")]
    QtyStepsUnsupported,

    #[error("unknown step function command {0}")]
    UnknownCommand(u8),

    #[error("step function index {index} out of range (length {len})")]
    StepIndexOutOfRange { index: usize, len: usize },

    #[error("invalid asset symbol {0:?}")]
    InvalidSymbol(String),

    #[error("invalid engine config: {0}")]
    InvalidConfig(&'static str),

    #[error("{0}")]
    Model(ModelError),
}

impl RateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RateError::AlreadyListed(_) => ErrorKind::Duplicate,
            RateError::NotListed(_) => ErrorKind::NotFound,
            RateError::Model(ModelError::Overflow) => ErrorKind::Overflow,
            _ => ErrorKind::Validation,
        }
    }
}

impl From<ModelError> for RateError {
    fn from(err: ModelError) -> Self {
        RateError::Model(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let knc = AssetId::from_symbol("KNC").unwrap();
        assert_eq!(RateError::AlreadyListed(knc).kind(), ErrorKind::Duplicate);
        assert_eq!(RateError::NotListed(knc).kind(), ErrorKind::NotFound);
        assert_eq!(RateError::from(ModelError::Overflow).kind(), ErrorKind::Overflow);
        assert_eq!(
            RateError::from(ModelError::NonIncreasingSteps).kind(),
            ErrorKind::Validation
        );
        assert_eq!(RateError::EpochOutOfRange(1 << 40).kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_messages() {
        let knc = AssetId::from_symbol("KNC").unwrap();
        assert_eq!(RateError::NotListed(knc).to_string(), "asset KNC is not listed");
        assert_eq!(
            RateError::from(ModelError::TooManySteps).to_string(),
            "too many step function breakpoints"
        );
    }
}
