//! # End-to-End Operation Tests
//!
//! Full flow from a mnemonic to a verified signed operation:
//!
//! 1. Derive a registry for accounts `[0, 20)`
//! 2. Register the matching validator records with a local provider
//! 3. Build through `OperationBuilderApi`
//! 4. Verify the signature against a domain computed independently

use std::sync::Arc;
use std::time::Duration;

use tree_hash::TreeHash;
use validator_operations::{
    compute_domain, compute_signing_root, verify, DomainType, ExecutionAddress, ForkVersion,
    LocalChainProvider, MockSubmitter, NetworkSpec, OperationBuilderApi, OperationBuilderService,
    OperationError, OperationsConfig, ProviderError, Root, SignedOperation, ValidatorRegistry,
    ValidatorStatus, ValidatorView, WithdrawalCredentials,
};

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

const GENESIS_VERSION: [u8; 4] = [0x10, 0x00, 0x00, 0x38];
const CAPELLA_VERSION: [u8; 4] = [0x40, 0x00, 0x00, 0x38];
const CAPELLA_EPOCH: u64 = 200;

type Service = OperationBuilderService<LocalChainProvider, MockSubmitter>;

fn network() -> NetworkSpec {
    NetworkSpec::new(
        ForkVersion::from(GENESIS_VERSION),
        Root::repeat_byte(0x5a),
        256,
    )
    .with_fork(CAPELLA_EPOCH, ForkVersion::from(CAPELLA_VERSION))
}

async fn setup(
    provider: LocalChainProvider,
    config: OperationsConfig,
) -> (Arc<Service>, Arc<LocalChainProvider>) {
    ops_telemetry::init_test_logging();

    let registry =
        ValidatorRegistry::from_mnemonic(MNEMONIC, None, config.index_range(), 0).unwrap();
    assert_eq!(registry.len(), 20);

    for identity in registry.iter() {
        provider
            .register_validator(ValidatorView {
                index: identity.index(),
                public_key: *identity.public_key(),
                status: ValidatorStatus::ActiveOngoing,
                withdrawal_credentials: WithdrawalCredentials::from_bls_pubkey(
                    &identity.withdrawal_public_key(),
                ),
            })
            .await;
    }

    let provider = Arc::new(provider);
    let service = Arc::new(OperationBuilderService::new(
        config,
        Arc::new(registry),
        provider.clone(),
        Arc::new(MockSubmitter::default()),
    ));
    (service, provider)
}

async fn default_setup() -> Arc<Service> {
    setup(
        LocalChainProvider::new("devnet", network()),
        OperationsConfig::for_testing(),
    )
    .await
    .0
}

#[tokio::test]
async fn test_exit_at_committee_period_verifies() {
    let service = default_setup().await;

    let signed = service.build_voluntary_exit(14, 256).await.unwrap();
    assert_eq!(signed.message.validator_index, 14);
    assert_eq!(signed.message.epoch, 256);

    let domain = compute_domain(
        DomainType::from([0x04, 0x00, 0x00, 0x00]),
        ForkVersion::from(CAPELLA_VERSION),
        Root::repeat_byte(0x5a),
    );
    let root = compute_signing_root(signed.message.tree_hash_root(), domain);
    let public_key = service.registry().get(14).unwrap().public_key();
    assert!(verify(public_key, &root, &signed.signature));

    // Not valid under the genesis fork.
    let genesis_domain = compute_domain(
        DomainType::from([0x04, 0x00, 0x00, 0x00]),
        ForkVersion::from(GENESIS_VERSION),
        Root::repeat_byte(0x5a),
    );
    let genesis_root = compute_signing_root(signed.message.tree_hash_root(), genesis_domain);
    assert!(!verify(public_key, &genesis_root, &signed.signature));
}

#[tokio::test]
async fn test_exit_one_epoch_early_rejected() {
    let service = default_setup().await;
    let result = service.build_voluntary_exit(14, 255).await;
    assert!(matches!(result, Err(OperationError::PolicyViolation(_))));
}

#[tokio::test]
async fn test_change_with_foreign_credentials_rejected() {
    let (service, provider) = setup(
        LocalChainProvider::new("devnet", network()),
        OperationsConfig::for_testing(),
    )
    .await;

    // Account 3's record commits to account 4's withdrawal key.
    let foreign = service.registry().get(4).unwrap().withdrawal_public_key();
    let identity = service.registry().get(3).unwrap();
    provider
        .register_validator(ValidatorView {
            index: 3,
            public_key: *identity.public_key(),
            status: ValidatorStatus::ActiveOngoing,
            withdrawal_credentials: WithdrawalCredentials::from_bls_pubkey(&foreign),
        })
        .await;

    let result = service
        .build_bls_to_execution_change(3, ExecutionAddress::repeat_byte(0xee))
        .await;
    assert!(matches!(result, Err(OperationError::IdentityMismatch(_))));
}

#[tokio::test]
async fn test_change_verifies_under_genesis_domain() {
    let service = default_setup().await;
    let address = ExecutionAddress::repeat_byte(0xee);
    let signed = service
        .build_bls_to_execution_change(5, address)
        .await
        .unwrap();

    let domain = compute_domain(
        DomainType::from([0x0a, 0x00, 0x00, 0x00]),
        ForkVersion::from(GENESIS_VERSION),
        Root::repeat_byte(0x5a),
    );
    let root = compute_signing_root(signed.message.tree_hash_root(), domain);
    let withdrawal_key = service.registry().get(5).unwrap().withdrawal_public_key();
    assert!(verify(&withdrawal_key, &root, &signed.signature));

    service
        .submit(SignedOperation::BlsToExecutionChange(signed))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let provider =
        LocalChainProvider::new("slow-devnet", network()).with_latency(Duration::from_millis(300));
    let config = OperationsConfig {
        provider_timeout_ms: 25,
        ..OperationsConfig::for_testing()
    };
    let (service, _) = setup(provider, config).await;

    let result = service.build_voluntary_exit(14, 256).await;
    assert!(matches!(
        result,
        Err(OperationError::Provider(ProviderError::Timeout { .. }))
    ));
}

#[tokio::test]
async fn test_concurrent_builds() {
    let service = default_setup().await;

    let handles: Vec<_> = (0..20u64)
        .map(|index| {
            let service = service.clone();
            tokio::spawn(async move { service.build_voluntary_exit(index, 300).await })
        })
        .collect();

    for (index, handle) in handles.into_iter().enumerate() {
        let signed = handle.await.unwrap().unwrap();
        assert_eq!(signed.message.validator_index, index as u64);
    }
}
