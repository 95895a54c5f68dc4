//! Multi-network keychain core
//!
//! This library owns cryptographic key material for a closed set of
//! blockchain networks (Bitcoin, Cardano, Ethereum). It derives per-network
//! keys from BIP39 mnemonics, signs and verifies data under BIP44-style key
//! paths, and persists key material as a password-encrypted blob.

pub mod error;
pub mod network;
pub mod key_path;
pub mod key;
pub mod crypto;
pub mod networks;
pub mod storage;

mod keychain;
mod manager;

// Re-export commonly used types for convenience
pub use crypto::mnemonic::Language;
pub use error::{Error, Result};
pub use key::{EntropySize, Key, KeyError, KeyFactory};
pub use key_path::{GenericKeyPath, KeyPath};
pub use keychain::Keychain;
pub use manager::KeychainManager;
pub use network::Network;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
