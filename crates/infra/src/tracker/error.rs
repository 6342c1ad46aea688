use thiserror::Error;

use pantry_core::{DomainError, ItemId};

use crate::collection::StorageError;
use crate::recommendations::RecommendationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// Rejected before any external call. The message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// Stored data broke a domain invariant (e.g. unreadable quantity).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("item not found: {0}")]
    NotFound(ItemId),

    #[error(transparent)]
    Storage(StorageError),

    #[error("recommendation service rate limit exceeded")]
    RateLimited,

    #[error(transparent)]
    Recommendation(RecommendationError),
}

impl From<DomainError> for TrackerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => TrackerError::Validation(msg),
            DomainError::InvalidId(msg) => TrackerError::Validation(msg),
            DomainError::InvariantViolation(msg) => TrackerError::InvariantViolation(msg),
        }
    }
}

impl From<StorageError> for TrackerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::NotFound(id) => TrackerError::NotFound(id),
            other => TrackerError::Storage(other),
        }
    }
}

impl From<RecommendationError> for TrackerError {
    fn from(value: RecommendationError) -> Self {
        match value {
            RecommendationError::RateLimited => TrackerError::RateLimited,
            other => TrackerError::Recommendation(other),
        }
    }
}
