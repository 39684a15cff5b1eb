//! # Inbound Ports (Driving Ports / API)
//!
//! Public API for building and signing consensus-layer operations.

use async_trait::async_trait;

use crate::domain::{
    BlsToExecutionChange, Epoch, ExecutionAddress, OperationError, SignedBlsToExecutionChange,
    SignedOperation, SignedVoluntaryExit, ValidatorIndex, VoluntaryExit,
};

/// Operation builder API.
///
/// The `build_*` methods run the checked path: live chain state is fetched,
/// policy and identity are validated, then the operation is signed with the
/// matching key. The `sign_*_unchecked` methods sign whatever message they are
/// given with the chosen validator's key and exist for negative tests.
#[async_trait]
pub trait OperationBuilderApi: Send + Sync {
    // =========================================================================
    // Checked path
    // =========================================================================

    /// Build and sign a voluntary exit for a local validator.
    ///
    /// # Errors
    /// * `PolicyViolation` - exit epoch before `SHARD_COMMITTEE_PERIOD`, or the
    ///   validator is not in a status that can exit
    /// * `IdentityMismatch` - the node returned a different validator
    /// * `Provider` - chain data unavailable or timed out
    async fn build_voluntary_exit(
        &self,
        validator: ValidatorIndex,
        exit_epoch: Epoch,
    ) -> Result<SignedVoluntaryExit, OperationError>;

    /// Build and sign a BLS-to-execution change for a local validator.
    ///
    /// # Errors
    /// * `IdentityMismatch` - on-chain withdrawal credentials do not commit to
    ///   the local withdrawal key
    /// * `Provider` - chain data unavailable or timed out
    async fn build_bls_to_execution_change(
        &self,
        validator: ValidatorIndex,
        to_execution_address: ExecutionAddress,
    ) -> Result<SignedBlsToExecutionChange, OperationError>;

    // =========================================================================
    // Unchecked path
    // =========================================================================

    /// Sign `exit` with the signing key of `signer`, whoever `exit` names.
    async fn sign_voluntary_exit_unchecked(
        &self,
        signer: ValidatorIndex,
        exit: VoluntaryExit,
    ) -> Result<SignedVoluntaryExit, OperationError>;

    /// Sign `change` with the withdrawal key of `signer`, whoever `change` names.
    async fn sign_bls_to_execution_change_unchecked(
        &self,
        signer: ValidatorIndex,
        change: BlsToExecutionChange,
    ) -> Result<SignedBlsToExecutionChange, OperationError>;

    // =========================================================================
    // Hand-off
    // =========================================================================

    /// Hand a signed operation to the submitter.
    async fn submit(&self, operation: SignedOperation) -> Result<(), OperationError>;
}
