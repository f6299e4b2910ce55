//! Error types for the pub/sub engine.

use crate::types::SubscriptionId;
use thiserror::Error;

/// Main error type for pub/sub operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PubSubError {
    #[error("Subscription {0} not found")]
    SubscriptionNotFound(SubscriptionId),
}

/// Result type for pub/sub operations.
pub type Result<T> = std::result::Result<T, PubSubError>;
