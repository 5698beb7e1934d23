//! Error types for the query cache
//!
//! Provides unified error handling using thiserror. Transport failures and
//! codec failures travel through the same call path but stay distinguishable.

use thiserror::Error;

// == Store Error Enum ==
/// Failure while acquiring a connection or talking to the remote store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Redis client failure, kept as-is
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// No connection could be handed out
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A store command failed for a reason other than the client itself
    #[error("Store command failed: {0}")]
    Command(String),
}

// == Codec Error Enum ==
/// Failure while turning a value into bytes or back.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Value could not be serialized
    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// Stored bytes could not be deserialized into the requested type
    #[error("Failed to decode value: {0}")]
    Decode(#[source] serde_json::Error),
}

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Missing or invalid construction input
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// Store unreachable or a remote command failed
    #[error("Transport error: {0}")]
    Transport(#[from] StoreError),

    /// Stored data could not be written or read back
    #[error("Serialization error: {0}")]
    Serialization(#[from] CodecError),

    /// The factory was switched off through its properties
    #[error("Cache disabled: {0}")]
    Disabled(String),
}

impl CacheError {
    /// Returns true for connection and remote-command failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, CacheError::Transport(_))
    }

    /// Returns true for codec failures.
    pub fn is_serialization(&self) -> bool {
        matches!(self, CacheError::Serialization(_))
    }
}

// == Result Type Aliases ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Result type for store primitives.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
