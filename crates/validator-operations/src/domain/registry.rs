//! # Validator Registry
//!
//! Immutable, index-ordered collection of derived validator identities.
//! Built once at startup and shared read-only (no lock) between builds.

use std::ops::Range;

use super::errors::OperationError;
use super::keys::{derive_validators, ValidatorIdentity};
use super::value_objects::{BlsPublicKey, ValidatorIndex};

/// Read-only set of validator identities with contiguous indices.
#[derive(Clone, Debug, Default)]
pub struct ValidatorRegistry {
    first_index: ValidatorIndex,
    identities: Vec<ValidatorIdentity>,
}

impl ValidatorRegistry {
    /// Derive every identity in `range` from a mnemonic.
    pub fn from_mnemonic(
        phrase: &str,
        passphrase: Option<&str>,
        range: Range<ValidatorIndex>,
        threads: usize,
    ) -> Result<Self, OperationError> {
        let first_index = range.start;
        let identities = derive_validators(phrase, passphrase, range, threads)?;
        tracing::info!(
            "[ops] Validator registry populated with {} identities",
            identities.len()
        );
        Ok(Self {
            first_index,
            identities,
        })
    }

    /// Build from already-derived identities.
    ///
    /// Indices must be contiguous and ascending.
    pub fn from_identities(identities: Vec<ValidatorIdentity>) -> Result<Self, OperationError> {
        let first_index = identities.first().map(|id| id.index()).unwrap_or_default();
        for (offset, identity) in identities.iter().enumerate() {
            if identity.index() != first_index + offset as u64 {
                return Err(OperationError::InvalidIndexRange {
                    min: first_index,
                    max: identity.index(),
                });
            }
        }
        Ok(Self {
            first_index,
            identities,
        })
    }

    /// Identity for an account index.
    pub fn get(&self, index: ValidatorIndex) -> Option<&ValidatorIdentity> {
        let offset = index.checked_sub(self.first_index)?;
        self.identities.get(usize::try_from(offset).ok()?)
    }

    /// Identity for an account index, or `UnknownValidator`.
    pub fn require(&self, index: ValidatorIndex) -> Result<&ValidatorIdentity, OperationError> {
        self.get(index)
            .ok_or(OperationError::UnknownValidator(index))
    }

    /// Find an identity by signing public key.
    ///
    /// Linear scan, O(n). Fine for test-network sized registries.
    pub fn find_by_public_key(&self, public_key: &BlsPublicKey) -> Option<&ValidatorIdentity> {
        self.identities
            .iter()
            .find(|identity| identity.public_key() == public_key)
    }

    /// Identities in index order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidatorIdentity> {
        self.identities.iter()
    }

    /// Signing public keys in index order.
    pub fn public_keys(&self) -> Vec<BlsPublicKey> {
        self.identities.iter().map(|id| *id.public_key()).collect()
    }

    /// Covered account indices.
    pub fn index_range(&self) -> Range<ValidatorIndex> {
        self.first_index..self.first_index + self.identities.len() as u64
    }

    /// Number of identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::keys::MasterSeed;

    const MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn registry() -> ValidatorRegistry {
        ValidatorRegistry::from_mnemonic(MNEMONIC, None, 3..7, 0).unwrap()
    }

    #[test]
    fn test_get_by_index() {
        let registry = registry();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.index_range(), 3..7);
        assert_eq!(registry.get(5).unwrap().index(), 5);
        assert!(registry.get(2).is_none());
        assert!(registry.get(7).is_none());
    }

    #[test]
    fn test_require_unknown_index() {
        let registry = registry();
        assert_eq!(
            registry.require(99).unwrap_err(),
            OperationError::UnknownValidator(99)
        );
    }

    #[test]
    fn test_find_by_public_key() {
        let registry = registry();
        let key = *registry.get(6).unwrap().public_key();
        assert_eq!(registry.find_by_public_key(&key).unwrap().index(), 6);
        assert!(registry
            .find_by_public_key(&BlsPublicKey::repeat_byte(0x01))
            .is_none());
    }

    #[test]
    fn test_from_identities_requires_contiguous() {
        let seed = MasterSeed::from_bytes([7u8; 64]);
        let ids = vec![
            ValidatorIdentity::derive(&seed, 0).unwrap(),
            ValidatorIdentity::derive(&seed, 2).unwrap(),
        ];
        assert!(ValidatorRegistry::from_identities(ids).is_err());
    }

    #[test]
    fn test_empty_registry() {
        let registry = ValidatorRegistry::from_identities(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.get(0).is_none());
    }
}
