/// Error types for Tab Yard
use thiserror::Error;

/// Failure talking to the key-value storage service
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage request failed: {0}")]
    Request(String),

    #[error("failed to encode `{key}`: {message}")]
    Encode { key: String, message: String },

    #[error("failed to decode storage response: {0}")]
    Decode(String),
}

/// Failure talking to the browser tab service
#[derive(Debug, Error)]
pub enum TabError {
    #[error("failed to query tabs: {0}")]
    Query(String),

    #[error("failed to open {url}: {message}")]
    Open { url: String, message: String },
}

/// Failure of a pool or user-level operation
#[derive(Debug, Error)]
pub enum PoolError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Tabs(#[from] TabError),
}

pub type Result<T, E = PoolError> = std::result::Result<T, E>;
