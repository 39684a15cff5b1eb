//! # Ops Telemetry
//!
//! Structured logging for validator operations tooling.
//!
//! Log output goes through `tracing-subscriber`: human-readable lines during
//! development, JSON lines when `OPS_JSON_LOGS` is set.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ops_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging(&TelemetryConfig::from_env())?;
//!     tracing::info!("[ops] starting");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod logging;

pub use config::TelemetryConfig;
pub use logging::{init_logging, init_test_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter `{directive}`: {reason}")]
    InvalidFilter {
        /// Directive as configured
        directive: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("Failed to install log subscriber: {0}")]
    SubscriberInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::SubscriberInit("already set".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to install log subscriber: already set"
        );
    }
}
