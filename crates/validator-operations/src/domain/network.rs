//! # Network Spec
//!
//! Fork schedule and spec constants of one network, used to compute domains
//! locally (devnets, tests) the same way a beacon node does.

use std::collections::BTreeMap;

use super::errors::ProviderError;
use super::value_objects::{
    DomainType, Epoch, ForkVersion, Root, SpecValue, DOMAIN_BLS_TO_EXECUTION_CHANGE,
    DOMAIN_VOLUNTARY_EXIT, SHARD_COMMITTEE_PERIOD,
};

/// Fork activation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForkScheduleEntry {
    /// First epoch of the fork.
    pub epoch: Epoch,
    /// Version in effect from `epoch`.
    pub version: ForkVersion,
}

/// Parameters needed to compute signing domains for one network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkSpec {
    /// Version in effect at genesis.
    pub genesis_fork_version: ForkVersion,
    /// Root of the genesis validator set.
    pub genesis_validators_root: Root,
    /// Forks after genesis, in any order.
    pub forks: Vec<ForkScheduleEntry>,
    /// Spec constants by name.
    pub constants: BTreeMap<String, SpecValue>,
}

impl NetworkSpec {
    /// A network with the public domain type constants and the given
    /// shard committee period.
    pub fn new(
        genesis_fork_version: ForkVersion,
        genesis_validators_root: Root,
        shard_committee_period: u64,
    ) -> Self {
        let mut constants = BTreeMap::new();
        constants.insert(
            DOMAIN_VOLUNTARY_EXIT.to_string(),
            SpecValue::DomainType(DomainType::from([0x04, 0x00, 0x00, 0x00])),
        );
        constants.insert(
            DOMAIN_BLS_TO_EXECUTION_CHANGE.to_string(),
            SpecValue::DomainType(DomainType::from([0x0a, 0x00, 0x00, 0x00])),
        );
        constants.insert(
            SHARD_COMMITTEE_PERIOD.to_string(),
            SpecValue::Uint(shard_committee_period),
        );
        Self {
            genesis_fork_version,
            genesis_validators_root,
            forks: Vec::new(),
            constants,
        }
    }

    /// Add a fork activating at `epoch`.
    pub fn with_fork(mut self, epoch: Epoch, version: ForkVersion) -> Self {
        self.forks.push(ForkScheduleEntry { epoch, version });
        self
    }

    /// Set or replace a spec constant.
    pub fn with_constant(mut self, name: &str, value: SpecValue) -> Self {
        self.constants.insert(name.to_string(), value);
        self
    }

    /// Look up a spec constant.
    pub fn constant(&self, name: &str) -> Result<&SpecValue, ProviderError> {
        self.constants
            .get(name)
            .ok_or_else(|| ProviderError::MissingConstant(name.to_string()))
    }

    /// Fork version in effect at `epoch`.
    pub fn fork_version_at(&self, epoch: Epoch) -> ForkVersion {
        self.forks
            .iter()
            .filter(|fork| fork.epoch <= epoch)
            .max_by_key(|fork| fork.epoch)
            .map(|fork| fork.version)
            .unwrap_or(self.genesis_fork_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> NetworkSpec {
        NetworkSpec::new(ForkVersion::from([0x10, 0, 0, 0]), Root::ZERO, 256)
            .with_fork(300, ForkVersion::from([0x30, 0, 0, 0]))
            .with_fork(100, ForkVersion::from([0x20, 0, 0, 0]))
    }

    #[test]
    fn test_fork_version_schedule() {
        let spec = spec();
        assert_eq!(spec.fork_version_at(0), ForkVersion::from([0x10, 0, 0, 0]));
        assert_eq!(spec.fork_version_at(99), ForkVersion::from([0x10, 0, 0, 0]));
        assert_eq!(spec.fork_version_at(100), ForkVersion::from([0x20, 0, 0, 0]));
        assert_eq!(spec.fork_version_at(5000), ForkVersion::from([0x30, 0, 0, 0]));
    }

    #[test]
    fn test_missing_constant() {
        assert_eq!(
            spec().constant("MAX_EFFECTIVE_BALANCE").unwrap_err(),
            ProviderError::MissingConstant("MAX_EFFECTIVE_BALANCE".to_string())
        );
    }

    #[test]
    fn test_default_constants() {
        let spec = spec();
        assert_eq!(
            spec.constant(SHARD_COMMITTEE_PERIOD)
                .unwrap()
                .as_u64(SHARD_COMMITTEE_PERIOD)
                .unwrap(),
            256
        );
        assert!(spec
            .constant(DOMAIN_VOLUNTARY_EXIT)
            .unwrap()
            .as_domain_type(DOMAIN_VOLUNTARY_EXIT)
            .is_ok());
    }
}
