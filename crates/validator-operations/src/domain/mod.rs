//! # Domain Layer
//!
//! Key derivation, SSZ containers and signing. No I/O.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod keys;
pub mod network;
pub mod registry;
pub mod signing;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use keys::{
    derive_secret_key, derive_validators, validate_index_range, BlsSecretKey, DerivationPath,
    MasterSeed, ValidatorIdentity, ValidatorMnemonic,
};
pub use network::{ForkScheduleEntry, NetworkSpec};
pub use registry::ValidatorRegistry;
pub use signing::{compute_domain, compute_fork_data_root, compute_signing_root, sign, verify, DST};
pub use value_objects::*;
