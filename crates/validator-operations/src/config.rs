//! # Operations Configuration
//!
//! Runtime knobs for derivation and provider calls.

use serde::{Deserialize, Serialize};
use std::env;
use std::ops::Range;
use std::time::Duration;
use thiserror::Error;

use crate::domain::ValidatorIndex;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Provider calls would time out immediately.
    #[error("provider_timeout_ms must be greater than zero")]
    ZeroTimeout,

    /// The validator index range is inverted.
    #[error("validator index range [{start}, {end}) is inverted")]
    InvertedIndexRange {
        /// Range start
        start: u64,
        /// Range end
        end: u64,
    },
}

/// Operation builder and derivation configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OperationsConfig {
    /// Timeout applied to every provider and submitter call.
    pub provider_timeout_ms: u64,

    /// First validator account index to derive (inclusive).
    pub validator_index_start: ValidatorIndex,

    /// Last validator account index to derive (exclusive).
    pub validator_index_end: ValidatorIndex,

    /// Worker threads for key derivation (0 = rayon global pool).
    pub derivation_threads: usize,
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 5000,
            validator_index_start: 0,
            validator_index_end: 64,
            derivation_threads: 0,
        }
    }
}

impl OperationsConfig {
    /// Create a config for testing (short timeout, small range).
    pub fn for_testing() -> Self {
        Self {
            provider_timeout_ms: 500,
            validator_index_start: 0,
            validator_index_end: 20,
            derivation_threads: 0,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OPS_PROVIDER_TIMEOUT_MS`: provider call timeout (default: 5000)
    /// - `OPS_VALIDATOR_INDEX_START`: first account index (default: 0)
    /// - `OPS_VALIDATOR_INDEX_END`: end account index, exclusive (default: 64)
    /// - `OPS_DERIVATION_THREADS`: derivation threads, 0 = auto (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            provider_timeout_ms: parse_env("OPS_PROVIDER_TIMEOUT_MS")
                .unwrap_or(defaults.provider_timeout_ms),
            validator_index_start: parse_env("OPS_VALIDATOR_INDEX_START")
                .unwrap_or(defaults.validator_index_start),
            validator_index_end: parse_env("OPS_VALIDATOR_INDEX_END")
                .unwrap_or(defaults.validator_index_end),
            derivation_threads: parse_env("OPS_DERIVATION_THREADS")
                .unwrap_or(defaults.derivation_threads),
        }
    }

    /// Reject values that cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.validator_index_start > self.validator_index_end {
            return Err(ConfigError::InvertedIndexRange {
                start: self.validator_index_start,
                end: self.validator_index_end,
            });
        }
        Ok(())
    }

    /// Provider call timeout.
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Validator account indices to derive.
    pub fn index_range(&self) -> Range<ValidatorIndex> {
        self.validator_index_start..self.validator_index_end
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
