//! Error types
//!
//! `StoreError` is what the core reports; `ApiError` wraps it for the
//! configuration, logging and command layers.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failures of a store mutation. A failed mutation leaves the store untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("out of memory: {0}")]
    OutOfMemory(String),
}

impl From<TryReserveError> for StoreError {
    fn from(err: TryReserveError) -> Self {
        StoreError::OutOfMemory(err.to_string())
    }
}

/// Errors surfaced by the outer layers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
