//! # Domain Entities
//!
//! SSZ containers for the operations this crate signs, plus the containers
//! used to derive domains and signing roots.

use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

use super::value_objects::{
    BlsPublicKey, BlsSignature, Domain, Epoch, ExecutionAddress, ForkVersion, Root,
    ValidatorIndex,
};

// =============================================================================
// Operation messages
// =============================================================================

/// Request to leave the active validator set.
#[derive(Clone, Debug, PartialEq, Eq, Hash, TreeHash)]
pub struct VoluntaryExit {
    /// Earliest epoch at which the exit may be processed.
    pub epoch: Epoch,
    /// On-chain index of the exiting validator.
    pub validator_index: ValidatorIndex,
}

/// Request to rotate BLS withdrawal credentials to an execution address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, TreeHash)]
pub struct BlsToExecutionChange {
    /// On-chain index of the validator.
    pub validator_index: ValidatorIndex,
    /// Withdrawal public key currently committed to on chain.
    pub from_bls_pubkey: BlsPublicKey,
    /// Execution address receiving future withdrawals.
    pub to_execution_address: ExecutionAddress,
}

/// A message together with its signature.
///
/// The signature is all-zero until the message has been signed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signed<M> {
    /// The signed message.
    pub message: M,
    /// BLS signature over the message's signing root.
    pub signature: BlsSignature,
}

impl<M> Signed<M> {
    /// Wrap a message with an empty signature.
    pub fn unsigned(message: M) -> Self {
        Self {
            message,
            signature: BlsSignature::ZERO,
        }
    }

    /// Whether a signature has been attached.
    pub fn is_signed(&self) -> bool {
        self.signature != BlsSignature::ZERO
    }
}

/// Signed voluntary exit.
pub type SignedVoluntaryExit = Signed<VoluntaryExit>;

/// Signed BLS-to-execution change.
pub type SignedBlsToExecutionChange = Signed<BlsToExecutionChange>;

/// Operation kinds handled by the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `VoluntaryExit`
    VoluntaryExit,
    /// `BLSToExecutionChange`
    BlsToExecutionChange,
}

impl OperationKind {
    /// Name of the spec constant holding this kind's domain type.
    pub fn domain_type_name(&self) -> &'static str {
        match self {
            OperationKind::VoluntaryExit => super::value_objects::DOMAIN_VOLUNTARY_EXIT,
            OperationKind::BlsToExecutionChange => {
                super::value_objects::DOMAIN_BLS_TO_EXECUTION_CHANGE
            }
        }
    }
}

/// An operation message that has not been signed yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnsignedOperation {
    /// Voluntary exit message.
    VoluntaryExit(VoluntaryExit),
    /// BLS-to-execution change message.
    BlsToExecutionChange(BlsToExecutionChange),
}

impl UnsignedOperation {
    /// Kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            UnsignedOperation::VoluntaryExit(_) => OperationKind::VoluntaryExit,
            UnsignedOperation::BlsToExecutionChange(_) => OperationKind::BlsToExecutionChange,
        }
    }

    /// SSZ hash tree root of the message.
    pub fn message_root(&self) -> Root {
        match self {
            UnsignedOperation::VoluntaryExit(exit) => exit.tree_hash_root(),
            UnsignedOperation::BlsToExecutionChange(change) => change.tree_hash_root(),
        }
    }

    /// Attach a signature, producing the signed operation.
    pub fn into_signed(self, signature: BlsSignature) -> SignedOperation {
        match self {
            UnsignedOperation::VoluntaryExit(message) => {
                SignedOperation::VoluntaryExit(Signed { message, signature })
            }
            UnsignedOperation::BlsToExecutionChange(message) => {
                SignedOperation::BlsToExecutionChange(Signed { message, signature })
            }
        }
    }
}

/// A signed operation ready to be handed to a submitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignedOperation {
    /// Signed voluntary exit.
    VoluntaryExit(SignedVoluntaryExit),
    /// Signed BLS-to-execution change.
    BlsToExecutionChange(SignedBlsToExecutionChange),
}

impl SignedOperation {
    /// Kind of this operation.
    pub fn kind(&self) -> OperationKind {
        match self {
            SignedOperation::VoluntaryExit(_) => OperationKind::VoluntaryExit,
            SignedOperation::BlsToExecutionChange(_) => OperationKind::BlsToExecutionChange,
        }
    }

    /// Signature attached to the operation.
    pub fn signature(&self) -> &BlsSignature {
        match self {
            SignedOperation::VoluntaryExit(signed) => &signed.signature,
            SignedOperation::BlsToExecutionChange(signed) => &signed.signature,
        }
    }

    /// SSZ hash tree root of the inner message.
    pub fn message_root(&self) -> Root {
        match self {
            SignedOperation::VoluntaryExit(signed) => signed.message.tree_hash_root(),
            SignedOperation::BlsToExecutionChange(signed) => signed.message.tree_hash_root(),
        }
    }

    /// On-chain index of the validator the operation refers to.
    pub fn validator_index(&self) -> ValidatorIndex {
        match self {
            SignedOperation::VoluntaryExit(signed) => signed.message.validator_index,
            SignedOperation::BlsToExecutionChange(signed) => signed.message.validator_index,
        }
    }
}

// =============================================================================
// Signing containers
// =============================================================================

/// Container hashed to produce a signing root.
#[derive(Clone, Debug, PartialEq, Eq, TreeHash)]
pub struct SigningData {
    /// Hash tree root of the signed object.
    pub object_root: Root,
    /// Signing domain.
    pub domain: Domain,
}

/// Container hashed to produce the fork-dependent half of a domain.
#[derive(Clone, Debug, PartialEq, Eq, TreeHash)]
pub struct ForkData {
    /// Fork version in effect.
    pub current_version: ForkVersion,
    /// Root of the genesis validator set.
    pub genesis_validators_root: Root,
}
