//! # Domain Errors
//!
//! Error types for key derivation, chain lookups and operation building.

use thiserror::Error;

/// Errors surfaced by a `ChainParameterProvider`.
///
/// Any of these aborts the build in progress. Nothing partially fetched is
/// used to construct or sign an operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The chain data source could not be reached.
    #[error("Chain data provider unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within the configured timeout.
    #[error("Provider call `{operation}` timed out after {timeout_ms}ms")]
    Timeout {
        /// Name of the provider operation
        operation: &'static str,
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// The network does not define the requested constant.
    #[error("Spec constant not found: {0}")]
    MissingConstant(String),

    /// The constant exists but has the wrong type.
    #[error("Spec constant {name} has type {found}, expected {expected}")]
    IncompatibleConstant {
        /// Constant name
        name: String,
        /// Type the caller asked for
        expected: &'static str,
        /// Type the provider returned
        found: &'static str,
    },

    /// No validator with the given public key is known to the node.
    #[error("Validator not found for public key {0}")]
    ValidatorNotFound(String),

    /// The provider answered with data that cannot be interpreted.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// Errors that can occur while deriving validators or building operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperationError {
    /// The mnemonic failed word count, wordlist or checksum validation.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// The requested validator index range is empty-inverted or too large.
    #[error("Invalid validator index range [{min}, {max})")]
    InvalidIndexRange {
        /// First index (inclusive)
        min: u64,
        /// Last index (exclusive)
        max: u64,
    },

    /// A key could not be derived for the given path.
    #[error("Key derivation failed for {path}: {reason}")]
    KeyDerivation {
        /// Derivation path, e.g. `m/12381/3600/0/0/0`
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// Chain data was unavailable, malformed or timed out.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The operation would be rejected by the consensus protocol.
    #[error("Policy violation: {0}")]
    PolicyViolation(String),

    /// Local key material does not match the on-chain validator record.
    #[error("Identity mismatch: {0}")]
    IdentityMismatch(String),

    /// The validator index is not part of the local registry.
    #[error("Unknown validator index {0}")]
    UnknownValidator(u64),

    /// Handing the signed operation to the submitter failed.
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),
}

impl OperationError {
    /// Whether this error was raised before any network or cryptographic work.
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            OperationError::InvalidMnemonic(_) | OperationError::InvalidIndexRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_error_message() {
        let err = ProviderError::Timeout {
            operation: "domain",
            timeout_ms: 250,
        };
        assert!(err.to_string().contains("250ms"));
        assert!(err.to_string().contains("domain"));
    }

    #[test]
    fn test_provider_error_converts() {
        let err: OperationError = ProviderError::Unavailable("node down".to_string()).into();
        assert!(matches!(err, OperationError::Provider(_)));
        assert!(err.to_string().contains("node down"));
    }

    #[test]
    fn test_input_validation_classification() {
        assert!(OperationError::InvalidMnemonic("bad".to_string()).is_input_validation());
        assert!(OperationError::InvalidIndexRange { min: 5, max: 1 }.is_input_validation());
        assert!(!OperationError::PolicyViolation("early".to_string()).is_input_validation());
    }
}
