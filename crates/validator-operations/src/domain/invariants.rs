//! # Domain Invariants
//!
//! Build-time checks that must hold before an operation is signed.

use super::errors::OperationError;
use super::value_objects::{BlsPublicKey, Epoch, ValidatorView};

/// Invariant: an exit epoch may not precede the shard committee period.
pub fn invariant_exit_epoch(
    exit_epoch: Epoch,
    shard_committee_period: u64,
) -> Result<(), OperationError> {
    if exit_epoch < shard_committee_period {
        return Err(OperationError::PolicyViolation(format!(
            "exit epoch {exit_epoch} is before SHARD_COMMITTEE_PERIOD {shard_committee_period}"
        )));
    }
    Ok(())
}

/// Invariant: only an active, non-exiting, non-slashed validator may exit.
pub fn invariant_exit_status(view: &ValidatorView) -> Result<(), OperationError> {
    if !view.status.can_exit() {
        return Err(OperationError::PolicyViolation(format!(
            "validator {} has status {} and cannot exit",
            view.index, view.status
        )));
    }
    Ok(())
}

/// Invariant: the node's record is for the key we asked about.
pub fn invariant_same_validator(
    view: &ValidatorView,
    expected: &BlsPublicKey,
) -> Result<(), OperationError> {
    if view.public_key != *expected {
        return Err(OperationError::IdentityMismatch(format!(
            "node returned validator {} with public key {}, expected {}",
            view.index, view.public_key, expected
        )));
    }
    Ok(())
}

/// Invariant: on-chain withdrawal credentials commit to our withdrawal key.
pub fn invariant_withdrawal_credentials(
    view: &ValidatorView,
    withdrawal_public_key: &BlsPublicKey,
) -> Result<(), OperationError> {
    if !view
        .withdrawal_credentials
        .matches_bls_pubkey(withdrawal_public_key)
    {
        return Err(OperationError::IdentityMismatch(format!(
            "withdrawal credentials {} of validator {} do not commit to withdrawal key {}",
            view.withdrawal_credentials.0, view.index, withdrawal_public_key
        )));
    }
    Ok(())
}
