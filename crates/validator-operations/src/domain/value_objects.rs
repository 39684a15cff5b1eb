//! # Domain Value Objects
//!
//! Fixed-size protocol values and the typed view of chain data returned by
//! the chain parameter provider.

use alloy_primitives::{Address, FixedBytes, B256};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use super::errors::ProviderError;

/// Epoch number.
pub type Epoch = u64;

/// Validator index as assigned by the beacon chain.
pub type ValidatorIndex = u64;

/// 32-byte SSZ hash tree root.
pub type Root = B256;

/// 32-byte signing domain.
pub type Domain = B256;

/// 4-byte domain type constant (e.g. `DOMAIN_VOLUNTARY_EXIT`).
pub type DomainType = FixedBytes<4>;

/// 4-byte fork version.
pub type ForkVersion = FixedBytes<4>;

/// Compressed BLS12-381 G1 public key (48 bytes).
pub type BlsPublicKey = FixedBytes<48>;

/// Compressed BLS12-381 G2 signature (96 bytes).
pub type BlsSignature = FixedBytes<96>;

/// 20-byte execution layer address.
pub type ExecutionAddress = Address;

/// Spec constant holding the voluntary exit domain type.
pub const DOMAIN_VOLUNTARY_EXIT: &str = "DOMAIN_VOLUNTARY_EXIT";

/// Spec constant holding the BLS-to-execution change domain type.
pub const DOMAIN_BLS_TO_EXECUTION_CHANGE: &str = "DOMAIN_BLS_TO_EXECUTION_CHANGE";

/// Spec constant holding the minimum active epochs before an exit.
pub const SHARD_COMMITTEE_PERIOD: &str = "SHARD_COMMITTEE_PERIOD";

/// Withdrawal credential prefix for BLS withdrawal keys.
pub const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;

/// Withdrawal credential prefix for execution addresses.
pub const ETH1_ADDRESS_WITHDRAWAL_PREFIX: u8 = 0x01;

/// A typed constant from the network's spec table.
///
/// Replaces reading an untyped value and casting it downstream: a constant
/// that is missing or of the wrong kind fails here, at the provider boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpecValue {
    /// Unsigned integer constant (epochs, counts).
    Uint(u64),
    /// Domain type constant.
    DomainType(DomainType),
    /// Fork version constant.
    Version(ForkVersion),
    /// Any other byte string.
    Bytes(Vec<u8>),
}

impl SpecValue {
    fn kind(&self) -> &'static str {
        match self {
            SpecValue::Uint(_) => "uint",
            SpecValue::DomainType(_) => "domain_type",
            SpecValue::Version(_) => "version",
            SpecValue::Bytes(_) => "bytes",
        }
    }

    /// Interpret as an integer constant.
    pub fn as_u64(&self, name: &str) -> Result<u64, ProviderError> {
        match self {
            SpecValue::Uint(value) => Ok(*value),
            other => Err(ProviderError::IncompatibleConstant {
                name: name.to_string(),
                expected: "uint",
                found: other.kind(),
            }),
        }
    }

    /// Interpret as a domain type constant.
    pub fn as_domain_type(&self, name: &str) -> Result<DomainType, ProviderError> {
        match self {
            SpecValue::DomainType(value) => Ok(*value),
            other => Err(ProviderError::IncompatibleConstant {
                name: name.to_string(),
                expected: "domain_type",
                found: other.kind(),
            }),
        }
    }

    /// Interpret as a fork version constant.
    pub fn as_version(&self, name: &str) -> Result<ForkVersion, ProviderError> {
        match self {
            SpecValue::Version(value) => Ok(*value),
            other => Err(ProviderError::IncompatibleConstant {
                name: name.to_string(),
                expected: "version",
                found: other.kind(),
            }),
        }
    }
}

/// Validator lifecycle status as reported by a beacon node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidatorStatus {
    /// Deposit processed, not yet eligible for activation.
    PendingInitialized,
    /// Queued for activation.
    PendingQueued,
    /// Active with no exit scheduled.
    ActiveOngoing,
    /// Active with an exit scheduled.
    ActiveExiting,
    /// Active but slashed.
    ActiveSlashed,
    /// Exited without being slashed.
    ExitedUnslashed,
    /// Exited after being slashed.
    ExitedSlashed,
    /// Balance may be withdrawn.
    WithdrawalPossible,
    /// Balance has been withdrawn.
    WithdrawalDone,
}

impl ValidatorStatus {
    /// Whether the validator is in the active set.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ValidatorStatus::ActiveOngoing
                | ValidatorStatus::ActiveExiting
                | ValidatorStatus::ActiveSlashed
        )
    }

    /// Whether a voluntary exit from this status would be accepted.
    pub fn can_exit(&self) -> bool {
        matches!(self, ValidatorStatus::ActiveOngoing)
    }

    /// Beacon API string for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorStatus::PendingInitialized => "pending_initialized",
            ValidatorStatus::PendingQueued => "pending_queued",
            ValidatorStatus::ActiveOngoing => "active_ongoing",
            ValidatorStatus::ActiveExiting => "active_exiting",
            ValidatorStatus::ActiveSlashed => "active_slashed",
            ValidatorStatus::ExitedUnslashed => "exited_unslashed",
            ValidatorStatus::ExitedSlashed => "exited_slashed",
            ValidatorStatus::WithdrawalPossible => "withdrawal_possible",
            ValidatorStatus::WithdrawalDone => "withdrawal_done",
        }
    }
}

impl fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValidatorStatus {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "pending_initialized" => ValidatorStatus::PendingInitialized,
            "pending_queued" => ValidatorStatus::PendingQueued,
            "active_ongoing" => ValidatorStatus::ActiveOngoing,
            "active_exiting" => ValidatorStatus::ActiveExiting,
            "active_slashed" => ValidatorStatus::ActiveSlashed,
            "exited_unslashed" => ValidatorStatus::ExitedUnslashed,
            "exited_slashed" => ValidatorStatus::ExitedSlashed,
            "withdrawal_possible" => ValidatorStatus::WithdrawalPossible,
            "withdrawal_done" => ValidatorStatus::WithdrawalDone,
            other => {
                return Err(ProviderError::MalformedResponse(format!(
                    "unknown validator status `{other}`"
                )))
            }
        };
        Ok(status)
    }
}

/// 32-byte withdrawal credentials recorded on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WithdrawalCredentials(pub B256);

impl WithdrawalCredentials {
    /// `0x00 || sha256(pubkey)[1..]` for a BLS withdrawal key.
    pub fn from_bls_pubkey(pubkey: &BlsPublicKey) -> Self {
        let digest = Sha256::digest(pubkey.as_slice());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        bytes[0] = BLS_WITHDRAWAL_PREFIX;
        Self(B256::from(bytes))
    }

    /// `0x01 || 0x00 * 11 || address` for an execution address.
    pub fn from_execution_address(address: &ExecutionAddress) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = ETH1_ADDRESS_WITHDRAWAL_PREFIX;
        bytes[12..].copy_from_slice(address.as_slice());
        Self(B256::from(bytes))
    }

    /// Credential prefix byte.
    pub fn prefix(&self) -> u8 {
        self.0[0]
    }

    /// Whether these credentials commit to the given BLS withdrawal key.
    pub fn matches_bls_pubkey(&self, pubkey: &BlsPublicKey) -> bool {
        self.prefix() == BLS_WITHDRAWAL_PREFIX && *self == Self::from_bls_pubkey(pubkey)
    }
}

/// A beacon node's view of one validator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorView {
    /// Index assigned on chain.
    pub index: ValidatorIndex,
    /// Validator signing public key.
    pub public_key: BlsPublicKey,
    /// Current lifecycle status.
    pub status: ValidatorStatus,
    /// Recorded withdrawal credentials.
    pub withdrawal_credentials: WithdrawalCredentials,
}
