//! Local Chain Provider Adapter
//!
//! Implements `ChainParameterProvider` from an in-memory `NetworkSpec` and a
//! table of validator records. Used for devnets and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::domain::{
    compute_domain, BlsPublicKey, Domain, DomainType, Epoch, NetworkSpec, ProviderError,
    SpecValue, ValidatorView,
};
use crate::ports::outbound::ChainParameterProvider;

/// In-memory chain parameter provider.
pub struct LocalChainProvider {
    /// Provider identifier.
    provider_id: String,
    /// Fork schedule and constants.
    network: NetworkSpec,
    /// Validator records keyed by the public key they are looked up by.
    validators: RwLock<HashMap<BlsPublicKey, ValidatorView>>,
    /// Availability.
    available: Arc<AtomicBool>,
    /// Simulated response latency.
    latency: Option<Duration>,
}

impl LocalChainProvider {
    /// Create a provider for `network` with no validators.
    pub fn new(provider_id: impl Into<String>, network: NetworkSpec) -> Self {
        Self {
            provider_id: provider_id.into(),
            network,
            validators: RwLock::new(HashMap::new()),
            available: Arc::new(AtomicBool::new(true)),
            latency: None,
        }
    }

    /// Delay every response by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Network this provider serves.
    pub fn network(&self) -> &NetworkSpec {
        &self.network
    }

    /// Add or replace a validator record, keyed by its own public key.
    pub async fn register_validator(&self, view: ValidatorView) {
        let key = view.public_key;
        self.register_view_for(key, view).await;
    }

    /// Answer lookups for `public_key` with `view`, whatever key `view` holds.
    pub async fn register_view_for(&self, public_key: BlsPublicKey, view: ValidatorView) {
        self.validators.write().await.insert(public_key, view);
    }

    /// Mark the node as unavailable.
    pub fn mark_unavailable(&self) {
        self.available.store(false, Ordering::SeqCst);
        warn!("[ops] Marked provider {} as unavailable", self.provider_id);
    }

    /// Mark the node as available.
    pub fn mark_available(&self) {
        self.available.store(true, Ordering::SeqCst);
    }

    /// Internal: simulate latency and availability.
    async fn respond(&self) -> Result<(), ProviderError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable(self.provider_id.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChainParameterProvider for LocalChainProvider {
    async fn spec_value(&self, name: &str) -> Result<SpecValue, ProviderError> {
        debug!("[ops] Spec constant {} from {}", name, self.provider_id);
        self.respond().await?;
        self.network.constant(name).cloned()
    }

    async fn genesis_domain(&self, domain_type: DomainType) -> Result<Domain, ProviderError> {
        self.respond().await?;
        Ok(compute_domain(
            domain_type,
            self.network.genesis_fork_version,
            self.network.genesis_validators_root,
        ))
    }

    async fn domain(&self, domain_type: DomainType, epoch: Epoch) -> Result<Domain, ProviderError> {
        self.respond().await?;
        Ok(compute_domain(
            domain_type,
            self.network.fork_version_at(epoch),
            self.network.genesis_validators_root,
        ))
    }

    async fn current_validator_view(
        &self,
        public_key: &BlsPublicKey,
    ) -> Result<ValidatorView, ProviderError> {
        debug!("[ops] Validator view for {} from {}", public_key, self.provider_id);
        self.respond().await?;
        self.validators
            .read()
            .await
            .get(public_key)
            .cloned()
            .ok_or_else(|| ProviderError::ValidatorNotFound(public_key.to_string()))
    }

    fn provider_id(&self) -> &str {
        &self.provider_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ForkVersion, Root, ValidatorStatus, WithdrawalCredentials, DOMAIN_VOLUNTARY_EXIT,
    };

    fn provider() -> LocalChainProvider {
        let network = NetworkSpec::new(
            ForkVersion::from([0x10, 0, 0, 0]),
            Root::repeat_byte(0x42),
            256,
        )
        .with_fork(100, ForkVersion::from([0x20, 0, 0, 0]));
        LocalChainProvider::new("local-test", network)
    }

    fn view(public_key: BlsPublicKey) -> ValidatorView {
        ValidatorView {
            index: 7,
            public_key,
            status: ValidatorStatus::ActiveOngoing,
            withdrawal_credentials: WithdrawalCredentials::from_bls_pubkey(&BlsPublicKey::ZERO),
        }
    }

    #[tokio::test]
    async fn test_lookup_domain_type() {
        let provider = provider();
        let domain_type = provider.lookup(DOMAIN_VOLUNTARY_EXIT).await.unwrap();
        assert_eq!(domain_type, DomainType::from([0x04, 0, 0, 0]));
    }

    #[tokio::test]
    async fn test_lookup_wrong_kind() {
        let provider = provider();
        assert!(matches!(
            provider.lookup("SHARD_COMMITTEE_PERIOD").await,
            Err(ProviderError::IncompatibleConstant { .. })
        ));
    }

    #[tokio::test]
    async fn test_domain_is_fork_aware() {
        let provider = provider();
        let domain_type = DomainType::from([0x04, 0, 0, 0]);
        let genesis = provider.genesis_domain(domain_type).await.unwrap();
        assert_eq!(provider.domain(domain_type, 99).await.unwrap(), genesis);
        assert_ne!(provider.domain(domain_type, 100).await.unwrap(), genesis);
    }

    #[tokio::test]
    async fn test_validator_view() {
        let provider = provider();
        let key = BlsPublicKey::repeat_byte(0x11);
        provider.register_validator(view(key)).await;

        assert_eq!(provider.current_validator_view(&key).await.unwrap().index, 7);
        assert!(matches!(
            provider
                .current_validator_view(&BlsPublicKey::repeat_byte(0x12))
                .await,
            Err(ProviderError::ValidatorNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unavailable_provider_fails() {
        let provider = provider();
        provider.mark_unavailable();
        assert!(matches!(
            provider.spec_value("SHARD_COMMITTEE_PERIOD").await,
            Err(ProviderError::Unavailable(_))
        ));

        provider.mark_available();
        assert!(provider.spec_value("SHARD_COMMITTEE_PERIOD").await.is_ok());
    }
}
