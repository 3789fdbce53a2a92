//! Configuration
//!
//! Layered loading with the `config` crate: built-in defaults, then an
//! optional TOML file, then `PATHSTORE_*` environment variables.

mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

pub use facade::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::value_index::DEFAULT_BUCKET_COUNT;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathStoreConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PathStoreConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        self.store.validate()
    }
}

/// Store sizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Number of value-index buckets; the hash needs a prime modulus
    #[serde(default = "default_bucket_count")]
    pub bucket_count: usize,

    /// Maximum number of nodes below the root; `None` means unbounded
    #[serde(default)]
    pub max_nodes: Option<usize>,
}

fn default_bucket_count() -> usize {
    DEFAULT_BUCKET_COUNT
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            bucket_count: default_bucket_count(),
            max_nodes: None,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_prime(self.bucket_count) {
            return Err(ApiError::ConfigError(format!(
                "store.bucket_count must be prime, got {}",
                self.bucket_count
            )));
        }
        Ok(())
    }
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 2;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}
