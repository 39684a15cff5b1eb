//! # Outbound Ports (Driven Ports / SPI)
//!
//! Chain data and submission collaborators this crate depends on.
//! Transport (beacon REST API, IPC, ...) is the adapter's concern.

use async_trait::async_trait;

use crate::domain::{
    BlsPublicKey, Domain, DomainType, Epoch, ProviderError, SignedOperation, SpecValue,
    ValidatorView,
};

/// Live chain parameters from a beacon node.
///
/// Domains must come from the network under test, never from hardcoded
/// mainnet constants. Each call is a single request/response; the caller
/// applies the timeout.
#[async_trait]
pub trait ChainParameterProvider: Send + Sync {
    /// Typed spec constant by name (e.g. `SHARD_COMMITTEE_PERIOD`).
    async fn spec_value(&self, name: &str) -> Result<SpecValue, ProviderError>;

    /// Domain type constant by name (e.g. `DOMAIN_VOLUNTARY_EXIT`).
    async fn lookup(&self, domain_type_name: &str) -> Result<DomainType, ProviderError> {
        self.spec_value(domain_type_name)
            .await?
            .as_domain_type(domain_type_name)
    }

    /// Domain computed with the genesis fork version.
    async fn genesis_domain(&self, domain_type: DomainType) -> Result<Domain, ProviderError>;

    /// Domain computed with the fork version in effect at `epoch`.
    async fn domain(&self, domain_type: DomainType, epoch: Epoch) -> Result<Domain, ProviderError>;

    /// The node's current record for the validator with `public_key`.
    async fn current_validator_view(
        &self,
        public_key: &BlsPublicKey,
    ) -> Result<ValidatorView, ProviderError>;

    /// Provider identifier (for logging).
    fn provider_id(&self) -> &str;
}

/// Receives signed operations, e.g. a beacon node's operation pool.
#[async_trait]
pub trait OperationSubmitter: Send + Sync {
    /// Submit one signed operation.
    async fn submit(&self, operation: SignedOperation) -> Result<(), ProviderError>;
}

// =============================================================================
// Mock implementations for testing
// =============================================================================

/// Mock submitter that records what it receives.
pub struct MockSubmitter {
    /// Operations accepted so far, in submission order.
    pub submitted: tokio::sync::Mutex<Vec<SignedOperation>>,
    /// Should return errors?
    pub should_fail: bool,
}

impl Default for MockSubmitter {
    fn default() -> Self {
        Self {
            submitted: tokio::sync::Mutex::new(Vec::new()),
            should_fail: false,
        }
    }
}

impl MockSubmitter {
    /// Number of operations accepted.
    pub async fn submitted_count(&self) -> usize {
        self.submitted.lock().await.len()
    }
}

#[async_trait]
impl OperationSubmitter for MockSubmitter {
    async fn submit(&self, operation: SignedOperation) -> Result<(), ProviderError> {
        if self.should_fail {
            return Err(ProviderError::Unavailable("Mock failure".to_string()));
        }
        self.submitted.lock().await.push(operation);
        Ok(())
    }
}
