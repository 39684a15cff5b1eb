//! # Operation Builder Service
//!
//! Builds voluntary exits and BLS-to-execution changes for local validators.
//!
//! Each build runs `Requested -> Validated -> Signed`. Validation fetches live
//! chain data through the `ChainParameterProvider`, checks policy and identity,
//! and resolves the signing domain. Only a `ValidatedOperation` can be signed,
//! and only this service can create one.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tree_hash::TreeHash;

use crate::config::OperationsConfig;
use crate::domain::{
    compute_signing_root, invariant_exit_epoch, invariant_exit_status, invariant_same_validator,
    invariant_withdrawal_credentials, sign, BlsSecretKey, BlsToExecutionChange, Domain, Epoch,
    ExecutionAddress, OperationError, OperationKind, ProviderError, Root, Signed,
    SignedBlsToExecutionChange, SignedOperation, SignedVoluntaryExit, ValidatorIdentity,
    ValidatorIndex, ValidatorRegistry, ValidatorView, VoluntaryExit, SHARD_COMMITTEE_PERIOD,
};
use crate::ports::{ChainParameterProvider, OperationBuilderApi, OperationSubmitter};

/// Which of a validator's keys signs an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyRole {
    /// Signing key (`m/12381/3600/i/0/0`).
    Signing,
    /// Withdrawal key (`m/12381/3600/i/0`).
    Withdrawal,
}

impl KeyRole {
    fn key_of(self, identity: &ValidatorIdentity) -> &BlsSecretKey {
        match self {
            KeyRole::Signing => identity.signing_key(),
            KeyRole::Withdrawal => identity.withdrawal_key(),
        }
    }
}

/// A message whose domain and signer are resolved and which is ready to sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedOperation<M> {
    signer: ValidatorIndex,
    message: M,
    domain: Domain,
    key_role: KeyRole,
}

impl<M: TreeHash> ValidatedOperation<M> {
    fn new(signer: ValidatorIndex, message: M, domain: Domain, key_role: KeyRole) -> Self {
        Self {
            signer,
            message,
            domain,
            key_role,
        }
    }

    /// Registry index of the account whose key signs.
    pub fn signer(&self) -> ValidatorIndex {
        self.signer
    }

    /// The message to sign.
    pub fn message(&self) -> &M {
        &self.message
    }

    /// Resolved signing domain.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Key that will sign.
    pub fn key_role(&self) -> KeyRole {
        self.key_role
    }

    /// `compute_signing_root(hash_tree_root(message), domain)`.
    pub fn signing_root(&self) -> Root {
        compute_signing_root(self.message.tree_hash_root(), self.domain)
    }
}

/// Operation Builder Service.
///
/// Holds the registry read-only; concurrent builds share nothing mutable.
pub struct OperationBuilderService<P: ChainParameterProvider, S: OperationSubmitter> {
    /// Configuration.
    config: OperationsConfig,
    /// Local validator identities.
    registry: Arc<ValidatorRegistry>,
    /// Live chain data.
    provider: Arc<P>,
    /// Operation sink.
    submitter: Arc<S>,
}

impl<P: ChainParameterProvider, S: OperationSubmitter> OperationBuilderService<P, S> {
    /// Create a new operation builder.
    pub fn new(
        config: OperationsConfig,
        registry: Arc<ValidatorRegistry>,
        provider: Arc<P>,
        submitter: Arc<S>,
    ) -> Self {
        Self {
            config,
            registry,
            provider,
            submitter,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &OperationsConfig {
        &self.config
    }

    /// Local validator identities.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check a voluntary exit against live chain state and resolve its domain.
    pub async fn validate_voluntary_exit(
        &self,
        validator: ValidatorIndex,
        exit_epoch: Epoch,
    ) -> Result<ValidatedOperation<VoluntaryExit>, OperationError> {
        let identity = self.registry.require(validator)?;
        let view = self.validator_view(identity).await?;
        invariant_exit_status(&view)?;

        let period = self
            .call("spec_value", self.provider.spec_value(SHARD_COMMITTEE_PERIOD))
            .await?
            .as_u64(SHARD_COMMITTEE_PERIOD)?;
        invariant_exit_epoch(exit_epoch, period)?;

        let message = VoluntaryExit {
            epoch: exit_epoch,
            validator_index: view.index,
        };
        let domain = self.voluntary_exit_domain(exit_epoch).await?;
        Ok(ValidatedOperation::new(
            validator,
            message,
            domain,
            KeyRole::Signing,
        ))
    }

    /// Check a BLS-to-execution change against live chain state and resolve
    /// its domain.
    pub async fn validate_bls_to_execution_change(
        &self,
        validator: ValidatorIndex,
        to_execution_address: ExecutionAddress,
    ) -> Result<ValidatedOperation<BlsToExecutionChange>, OperationError> {
        let identity = self.registry.require(validator)?;
        let view = self.validator_view(identity).await?;

        let withdrawal_public_key = identity.withdrawal_public_key();
        invariant_withdrawal_credentials(&view, &withdrawal_public_key)?;

        let message = BlsToExecutionChange {
            validator_index: view.index,
            from_bls_pubkey: withdrawal_public_key,
            to_execution_address,
        };
        let domain = self.bls_to_execution_change_domain().await?;
        Ok(ValidatedOperation::new(
            validator,
            message,
            domain,
            KeyRole::Withdrawal,
        ))
    }

    // =========================================================================
    // Signing
    // =========================================================================

    /// Sign a validated operation with the key its role selects.
    pub fn sign<M: TreeHash>(
        &self,
        validated: ValidatedOperation<M>,
    ) -> Result<Signed<M>, OperationError> {
        let identity = self.registry.require(validated.signer)?;
        let signing_root = validated.signing_root();
        let signature = sign(validated.key_role.key_of(identity), &signing_root);
        Ok(Signed {
            message: validated.message,
            signature,
        })
    }

    // =========================================================================
    // Provider calls
    // =========================================================================

    /// Internal: run one provider call under the configured timeout.
    async fn call<T, F>(&self, operation: &'static str, request: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        match tokio::time::timeout(self.config.provider_timeout(), request).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "[ops] Provider {} timed out on {} after {}ms",
                    self.provider.provider_id(),
                    operation,
                    self.config.provider_timeout_ms
                );
                Err(ProviderError::Timeout {
                    operation,
                    timeout_ms: self.config.provider_timeout_ms,
                })
            }
        }
    }

    /// Internal: the node's record for `identity`, checked to be the same key.
    async fn validator_view(
        &self,
        identity: &ValidatorIdentity,
    ) -> Result<ValidatorView, OperationError> {
        let view = self
            .call(
                "current_validator_view",
                self.provider.current_validator_view(identity.public_key()),
            )
            .await?;
        invariant_same_validator(&view, identity.public_key())?;
        debug!(
            "[ops] Account {} is validator {} ({})",
            identity.index(),
            view.index,
            view.status
        );
        Ok(view)
    }

    /// Internal: fork-aware domain for exits at `epoch`.
    async fn voluntary_exit_domain(&self, epoch: Epoch) -> Result<Domain, ProviderError> {
        let domain_type = self
            .call(
                "lookup",
                self.provider
                    .lookup(OperationKind::VoluntaryExit.domain_type_name()),
            )
            .await?;
        self.call("domain", self.provider.domain(domain_type, epoch))
            .await
    }

    /// Internal: genesis domain for BLS-to-execution changes.
    async fn bls_to_execution_change_domain(&self) -> Result<Domain, ProviderError> {
        let domain_type = self
            .call(
                "lookup",
                self.provider
                    .lookup(OperationKind::BlsToExecutionChange.domain_type_name()),
            )
            .await?;
        self.call("genesis_domain", self.provider.genesis_domain(domain_type))
            .await
    }
}

#[async_trait]
impl<P: ChainParameterProvider, S: OperationSubmitter> OperationBuilderApi
    for OperationBuilderService<P, S>
{
    async fn build_voluntary_exit(
        &self,
        validator: ValidatorIndex,
        exit_epoch: Epoch,
    ) -> Result<SignedVoluntaryExit, OperationError> {
        let validated = self
            .validate_voluntary_exit(validator, exit_epoch)
            .await
            .inspect_err(|e| {
                warn!("[ops] Voluntary exit for account {} rejected: {}", validator, e)
            })?;
        let signed = self.sign(validated)?;
        info!(
            "[ops] Built voluntary exit for validator {} at epoch {}",
            signed.message.validator_index, signed.message.epoch
        );
        Ok(signed)
    }

    async fn build_bls_to_execution_change(
        &self,
        validator: ValidatorIndex,
        to_execution_address: ExecutionAddress,
    ) -> Result<SignedBlsToExecutionChange, OperationError> {
        let validated = self
            .validate_bls_to_execution_change(validator, to_execution_address)
            .await
            .inspect_err(|e| {
                warn!(
                    "[ops] BLS-to-execution change for account {} rejected: {}",
                    validator, e
                )
            })?;
        let signed = self.sign(validated)?;
        info!(
            "[ops] Built BLS-to-execution change for validator {} to {}",
            signed.message.validator_index, signed.message.to_execution_address
        );
        Ok(signed)
    }

    async fn sign_voluntary_exit_unchecked(
        &self,
        signer: ValidatorIndex,
        exit: VoluntaryExit,
    ) -> Result<SignedVoluntaryExit, OperationError> {
        self.registry.require(signer)?;
        let domain = self.voluntary_exit_domain(exit.epoch).await?;
        debug!(
            "[ops] Signing unchecked exit for validator {} with account {}",
            exit.validator_index, signer
        );
        self.sign(ValidatedOperation::new(
            signer,
            exit,
            domain,
            KeyRole::Signing,
        ))
    }

    async fn sign_bls_to_execution_change_unchecked(
        &self,
        signer: ValidatorIndex,
        change: BlsToExecutionChange,
    ) -> Result<SignedBlsToExecutionChange, OperationError> {
        self.registry.require(signer)?;
        let domain = self.bls_to_execution_change_domain().await?;
        debug!(
            "[ops] Signing unchecked BLS-to-execution change for validator {} with account {}",
            change.validator_index, signer
        );
        self.sign(ValidatedOperation::new(
            signer,
            change,
            domain,
            KeyRole::Withdrawal,
        ))
    }

    async fn submit(&self, operation: SignedOperation) -> Result<(), OperationError> {
        let kind = operation.kind();
        let validator_index = operation.validator_index();
        let timeout = self.config.provider_timeout();

        match tokio::time::timeout(timeout, self.submitter.submit(operation)).await {
            Ok(Ok(())) => {
                info!(
                    "[ops] Submitted {:?} for validator {}",
                    kind, validator_index
                );
                Ok(())
            }
            Ok(Err(e)) => {
                warn!("[ops] Submission of {:?} failed: {}", kind, e);
                Err(OperationError::SubmissionFailed(e.to_string()))
            }
            Err(_) => {
                let e = ProviderError::Timeout {
                    operation: "submit",
                    timeout_ms: self.config.provider_timeout_ms,
                };
                warn!("[ops] Submission of {:?} failed: {}", kind, e);
                Err(OperationError::SubmissionFailed(e.to_string()))
            }
        }
    }
}
