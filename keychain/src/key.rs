//! Key and key factory traits

use thiserror::Error;

use crate::key_path::{KeyPath, KeyPathError};
use crate::network::Network;

/// Errors produced by per-network key implementations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid key path: {0}")]
    InvalidPath(#[from] KeyPathError),
    #[error("Invalid key size {0}, expected {1}")]
    InvalidKeySize(usize, usize),
    #[error("Invalid key data: {0}")]
    InvalidKeyData(String),
    #[error("Invalid signature size {0}, expected {1}")]
    InvalidSignatureSize(usize, usize),
    #[error("Signing failed: {0}")]
    Signing(String),
}

/// Range of BIP39 entropy sizes (in bits) a network accepts
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EntropySize {
    pub min: usize,
    pub max: usize,
}

impl EntropySize {
    /// Mnemonic length for the minimal accepted entropy.
    pub fn min_words(&self) -> usize {
        self.min / 32 * 3
    }

    /// Mnemonic length for the maximal accepted entropy.
    pub fn max_words(&self) -> usize {
        self.max / 32 * 3
    }
}

/// A network-specific root key.
///
/// Implementations derive child keys internally from the [`KeyPath`] handed
/// to each operation; the derived material never leaves the implementation.
pub trait Key: Send {
    fn network(&self) -> Network;

    /// Serialized public key for the given path.
    fn pub_key(&self, path: &dyn KeyPath) -> Result<Vec<u8>, KeyError>;

    /// Raw address bytes for the given path.
    fn address(&self, path: &dyn KeyPath) -> Result<Vec<u8>, KeyError>;

    fn sign(&self, data: &[u8], path: &dyn KeyPath) -> Result<Vec<u8>, KeyError>;

    fn verify(&self, data: &[u8], signature: &[u8], path: &dyn KeyPath) -> Result<bool, KeyError>;

    fn boxed(self) -> Box<dyn Key>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// Constructor of [`Key`] instances for one network.
pub trait KeyFactory: Send + Sync {
    fn network(&self) -> Network;

    fn entropy_size(&self) -> EntropySize;

    /// Restore a key from its serialized form.
    fn key_from_data(&self, data: &[u8]) -> Result<Box<dyn Key>, KeyError>;

    /// Produce the serialized key material for a BIP39 seed.
    fn key_data_from_seed(&self, seed: &[u8]) -> Result<Vec<u8>, KeyError>;

    fn boxed(self) -> Box<dyn KeyFactory>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}
