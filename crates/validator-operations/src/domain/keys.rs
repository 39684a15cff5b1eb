//! # Seed Derivation (EIP-2333 / EIP-2334)
//!
//! Mnemonic → seed → per-index validator key pairs.
//!
//! ## Key Tree
//!
//! Keys are derived with the EIP-2333 HKDF/lamport tree over BLS12-381
//! (`derive_master_SK`, then `derive_child_SK` per path component). Paths
//! follow EIP-2334:
//!
//! | Key        | Path                   |
//! |------------|------------------------|
//! | signing    | `m/12381/3600/i/0/0`   |
//! | withdrawal | `m/12381/3600/i/0`     |
//!
//! The tree walk is delegated to blst, so any other EIP-2333 implementation
//! given the same seed yields identical keys.
//!
//! ## Parallelism
//!
//! Derivation is CPU-bound and independent per index, so it runs on rayon.
//! Results are collected in index order regardless of completion order.

use bip39::Mnemonic;
use blst::min_pk::SecretKey;
use rayon::prelude::*;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use zeroize::Zeroizing;

use super::errors::OperationError;
use super::value_objects::{BlsPublicKey, ValidatorIndex};

/// EIP-2334 purpose component.
pub const PURPOSE: u32 = 12381;

/// EIP-2334 coin type for Ethereum.
pub const COIN_TYPE: u32 = 3600;

// =============================================================================
// Mnemonic and seed
// =============================================================================

/// BIP-39 mnemonic validated against the English wordlist and checksum.
#[derive(Clone)]
pub struct ValidatorMnemonic {
    inner: Mnemonic,
}

// Never print the phrase.
impl fmt::Debug for ValidatorMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorMnemonic")
            .field("word_count", &self.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl ValidatorMnemonic {
    /// Parse and validate a phrase.
    ///
    /// Surrounding and repeated whitespace is normalised away before
    /// validation.
    pub fn parse(phrase: &str) -> Result<Self, OperationError> {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        let inner = Mnemonic::parse(normalized.as_str())
            .map_err(|e| OperationError::InvalidMnemonic(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Number of words in the phrase.
    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// PBKDF2-HMAC-SHA512 seed for this mnemonic.
    pub fn to_seed(&self, passphrase: Option<&str>) -> MasterSeed {
        MasterSeed {
            bytes: Zeroizing::new(self.inner.to_seed(passphrase.unwrap_or(""))),
        }
    }
}

/// 64-byte BIP-39 seed. Zeroized on drop.
pub struct MasterSeed {
    bytes: Zeroizing<[u8; 64]>,
}

impl fmt::Debug for MasterSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSeed([REDACTED])")
    }
}

impl MasterSeed {
    /// Use raw bytes as a seed (EIP-2333 requires at least 32 bytes).
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    /// Seed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }
}

// =============================================================================
// Derivation paths
// =============================================================================

/// An EIP-2333 derivation path such as `m/12381/3600/0/0/0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    components: Vec<u32>,
}

impl DerivationPath {
    /// Signing key path `m/12381/3600/i/0/0` for an account index.
    pub fn signing(account: u32) -> Self {
        Self {
            components: vec![PURPOSE, COIN_TYPE, account, 0, 0],
        }
    }

    /// Withdrawal key path `m/12381/3600/i/0` for an account index.
    pub fn withdrawal(account: u32) -> Self {
        Self {
            components: vec![PURPOSE, COIN_TYPE, account, 0],
        }
    }

    /// Child indices below the master node.
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Number of levels below the master node.
    pub fn depth(&self) -> usize {
        self.components.len()
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for component in &self.components {
            write!(f, "/{component}")?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = OperationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| OperationError::KeyDerivation {
            path: s.to_string(),
            reason,
        };

        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(invalid("path must start with `m`".to_string()));
        }

        let components = parts
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| invalid(format!("invalid path component `{part}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { components })
    }
}

// =============================================================================
// Keys
// =============================================================================

/// BLS12-381 secret key. `Debug` never prints the scalar.
#[derive(Clone)]
pub struct BlsSecretKey {
    inner: SecretKey,
}

impl fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlsSecretKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}

impl BlsSecretKey {
    /// Parse a 32-byte big-endian scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, OperationError> {
        let inner = SecretKey::from_bytes(bytes).map_err(|e| OperationError::KeyDerivation {
            path: "<raw>".to_string(),
            reason: format!("{e:?}"),
        })?;
        Ok(Self { inner })
    }

    /// Big-endian scalar bytes.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.inner.to_bytes())
    }

    /// Compressed public key `serialize(sk · G1)`.
    pub fn public_key(&self) -> BlsPublicKey {
        BlsPublicKey::from(self.inner.sk_to_pk().to_bytes())
    }

    pub(crate) fn as_blst(&self) -> &SecretKey {
        &self.inner
    }
}

/// Derive the secret key at `path` from `seed`.
pub fn derive_secret_key(
    seed: &MasterSeed,
    path: &DerivationPath,
) -> Result<BlsSecretKey, OperationError> {
    let master = SecretKey::derive_master_eip2333(seed.as_bytes()).map_err(|e| {
        OperationError::KeyDerivation {
            path: path.to_string(),
            reason: format!("master key derivation failed: {e:?}"),
        }
    })?;

    let inner = path
        .components()
        .iter()
        .fold(master, |parent, index| parent.derive_child_eip2333(*index));

    Ok(BlsSecretKey { inner })
}

// =============================================================================
// Validator identities
// =============================================================================

/// Keys owned by one validator account.
#[derive(Clone, Debug)]
pub struct ValidatorIdentity {
    index: ValidatorIndex,
    signing_key: BlsSecretKey,
    withdrawal_key: BlsSecretKey,
    public_key: BlsPublicKey,
}

impl ValidatorIdentity {
    /// Derive the identity for one account index.
    pub fn derive(seed: &MasterSeed, index: ValidatorIndex) -> Result<Self, OperationError> {
        let account = u32::try_from(index).map_err(|_| OperationError::InvalidIndexRange {
            min: index,
            max: index.saturating_add(1),
        })?;

        let signing_key = derive_secret_key(seed, &DerivationPath::signing(account))?;
        let withdrawal_key = derive_secret_key(seed, &DerivationPath::withdrawal(account))?;
        let public_key = signing_key.public_key();

        Ok(Self {
            index,
            signing_key,
            withdrawal_key,
            public_key,
        })
    }

    /// Account index used in the derivation path.
    pub fn index(&self) -> ValidatorIndex {
        self.index
    }

    /// Validator signing public key.
    pub fn public_key(&self) -> &BlsPublicKey {
        &self.public_key
    }

    /// Withdrawal public key.
    pub fn withdrawal_public_key(&self) -> BlsPublicKey {
        self.withdrawal_key.public_key()
    }

    /// Key used for voluntary exits and duties.
    pub fn signing_key(&self) -> &BlsSecretKey {
        &self.signing_key
    }

    /// Key used for BLS-to-execution changes.
    pub fn withdrawal_key(&self) -> &BlsSecretKey {
        &self.withdrawal_key
    }
}

/// Check that `[range.start, range.end)` can be expressed as EIP-2334 paths.
pub fn validate_index_range(range: &Range<ValidatorIndex>) -> Result<(), OperationError> {
    let max_account = u64::from(u32::MAX) + 1;
    if range.start > range.end || range.end > max_account {
        return Err(OperationError::InvalidIndexRange {
            min: range.start,
            max: range.end,
        });
    }
    Ok(())
}

/// Derive all identities in `range` from a mnemonic phrase.
///
/// The mnemonic and the range are validated before any key is derived.
/// `threads == 0` uses rayon's global pool.
pub fn derive_validators(
    phrase: &str,
    passphrase: Option<&str>,
    range: Range<ValidatorIndex>,
    threads: usize,
) -> Result<Vec<ValidatorIdentity>, OperationError> {
    let mnemonic = ValidatorMnemonic::parse(phrase)?;
    validate_index_range(&range)?;

    let seed = mnemonic.to_seed(passphrase);
    tracing::debug!(
        "[ops] Deriving validators [{}, {}) with {} threads",
        range.start,
        range.end,
        threads
    );

    let derive_all = || {
        range
            .clone()
            .into_par_iter()
            .map(|index| ValidatorIdentity::derive(&seed, index))
            .collect::<Result<Vec<_>, _>>()
    };

    if threads == 0 {
        return derive_all();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| OperationError::KeyDerivation {
            path: "<pool>".to_string(),
            reason: e.to_string(),
        })?;
    pool.install(derive_all)
}
