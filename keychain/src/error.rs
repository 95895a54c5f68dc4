//! Error types for the keychain library

use thiserror::Error;

use crate::key::KeyError;
use crate::key_path::KeyPathError;
use crate::network::Network;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Wrong password")]
    WrongPassword,

    #[error("Not enough data to open the keychain")]
    NotEnoughData,

    #[error("Entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Can't reconcile entropy size across networks: min({0}), max({1})")]
    CantCalculateEntropySize(usize, usize),

    #[error("Invalid seed size {0}, expected {1}")]
    InvalidSeedSize(usize, usize),

    #[error("Key for network {0} does not exist")]
    KeyDoesNotExist(Network),

    #[error("Network {0} is not supported")]
    NetworkIsNotSupported(Network),

    #[error("Unsupported storage version {0}")]
    UnsupportedStorageVersion(u16),

    #[error("Storage format error: {0}")]
    Storage(String),

    #[error("Mnemonic error: {0}")]
    Mnemonic(String),

    #[error("Key path error: {0}")]
    KeyPath(#[from] KeyPathError),

    #[error("Key error for network {0}: {1}")]
    Key(Network, KeyError),
}

impl Error {
    pub(crate) fn from_key_error(network: &Network, err: KeyError) -> Self {
        Error::Key(*network, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

/// Result type for keychain operations
pub type Result<T> = std::result::Result<T, Error>;
