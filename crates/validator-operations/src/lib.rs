//! # Validator Operations
//!
//! Deterministic validator keys and signed consensus-layer operations for
//! Ethereum test networks.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Turn one BIP-39 mnemonic into a reproducible set of BLS validator
//! identities, then build and sign the operations a test harness needs:
//! - `VoluntaryExit`, signed with the validator's signing key
//! - `BLSToExecutionChange`, signed with the validator's withdrawal key
//!
//! Domains always come from the live network through a
//! `ChainParameterProvider`, never from baked-in mainnet constants.
//!
//! ## Checks Before Signing
//!
//! | Operation | Rejected with | When |
//! |-----------|---------------|------|
//! | Voluntary exit | `PolicyViolation` | exit epoch < `SHARD_COMMITTEE_PERIOD` |
//! | Voluntary exit | `PolicyViolation` | validator is not active and ongoing |
//! | Both | `IdentityMismatch` | node returns a record for a different key |
//! | BLS-to-execution change | `IdentityMismatch` | withdrawal credentials do not commit to the local withdrawal key |
//!
//! The `sign_*_unchecked` entry points skip all of these so that invalid
//! operations can be produced on purpose.
//!
//! ## Module Structure
//!
//! ```text
//! validator-operations/
//! ├── domain/          # Keys, registry, SSZ containers, signing, invariants
//! ├── ports/           # API trait (inbound) + provider/submitter traits (outbound)
//! ├── adapters/        # LocalChainProvider
//! ├── application/     # OperationBuilderService
//! └── config.rs        # OperationsConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::LocalChainProvider;
pub use application::{KeyRole, OperationBuilderService, ValidatedOperation};
pub use config::{ConfigError, OperationsConfig};
pub use domain::{
    compute_domain, compute_fork_data_root, compute_signing_root, derive_validators, sign, verify,
    BlsPublicKey, BlsSecretKey, BlsSignature, BlsToExecutionChange, DerivationPath, Domain,
    DomainType, Epoch, ExecutionAddress, ForkVersion, MasterSeed, NetworkSpec, OperationError,
    OperationKind, ProviderError, Root, Signed, SignedBlsToExecutionChange, SignedOperation,
    SignedVoluntaryExit, SpecValue, ValidatorIdentity, ValidatorIndex, ValidatorMnemonic,
    ValidatorRegistry, ValidatorStatus, ValidatorView, VoluntaryExit, WithdrawalCredentials,
    DOMAIN_BLS_TO_EXECUTION_CHANGE, DOMAIN_VOLUNTARY_EXIT, SHARD_COMMITTEE_PERIOD,
};
pub use ports::{ChainParameterProvider, MockSubmitter, OperationBuilderApi, OperationSubmitter};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
