//! # Signing Engine (BLS12-381)
//!
//! Signing roots, domains and raw BLS signatures.
//!
//! ## Implementation Details
//!
//! Consensus-layer signatures use blst's `min_pk` variant:
//! - Public keys are on G1 (48 bytes compressed)
//! - Signatures are on G2 (96 bytes compressed)
//!
//! ## Caller Responsibility
//!
//! Nothing here checks that a key belongs to the validator named in the
//! message. Signing with an unrelated key is allowed and is how invalid
//! operations for negative tests are produced. The checked path lives in
//! the operation builder.

use blst::min_pk::{PublicKey, Signature};
use blst::BLST_ERROR;
use tree_hash::TreeHash;

use super::entities::{ForkData, SigningData};
use super::keys::BlsSecretKey;
use super::value_objects::{BlsPublicKey, BlsSignature, Domain, DomainType, ForkVersion, Root};

/// Proof-of-possession ciphersuite used by the consensus layer.
pub const DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// `hash_tree_root(SigningData { object_root, domain })`.
pub fn compute_signing_root(object_root: Root, domain: Domain) -> Root {
    SigningData {
        object_root,
        domain,
    }
    .tree_hash_root()
}

/// `hash_tree_root(ForkData { current_version, genesis_validators_root })`.
pub fn compute_fork_data_root(current_version: ForkVersion, genesis_validators_root: Root) -> Root {
    ForkData {
        current_version,
        genesis_validators_root,
    }
    .tree_hash_root()
}

/// Domain type followed by the first 28 bytes of the fork data root.
pub fn compute_domain(
    domain_type: DomainType,
    fork_version: ForkVersion,
    genesis_validators_root: Root,
) -> Domain {
    let fork_data_root = compute_fork_data_root(fork_version, genesis_validators_root);
    let mut domain = [0u8; 32];
    domain[..4].copy_from_slice(domain_type.as_slice());
    domain[4..].copy_from_slice(&fork_data_root[..28]);
    Domain::from(domain)
}

/// Sign a signing root.
pub fn sign(secret_key: &BlsSecretKey, signing_root: &Root) -> BlsSignature {
    let signature = secret_key.as_blst().sign(signing_root.as_slice(), DST, &[]);
    BlsSignature::from(signature.to_bytes())
}

/// Verify a signature over a signing root.
///
/// Returns `false` for malformed keys or signatures.
pub fn verify(public_key: &BlsPublicKey, signing_root: &Root, signature: &BlsSignature) -> bool {
    let Ok(sig) = Signature::from_bytes(signature.as_slice()) else {
        return false;
    };

    let Ok(pk) = PublicKey::from_bytes(public_key.as_slice()) else {
        return false;
    };

    let result = sig.verify(true, signing_root.as_slice(), DST, &[], &pk, true);
    result == BLST_ERROR::BLST_SUCCESS
}
