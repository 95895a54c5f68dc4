//! Storage document for serialized key material
//!
//! A versioned JSON document carrying the serialized root key of every
//! network in the keychain. The document is always sealed with
//! [`crate::crypto::cipher`] before it leaves the library.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::network::Network;

/// Current document version
pub const STORAGE_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredKey {
    network: Network,
    /// Serialized key material, base64
    key: String,
}

/// The plaintext wallet document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletData {
    version: u16,
    keys: Vec<StoredKey>,
}

impl WalletData {
    pub fn new(keys: &[(Network, Vec<u8>)]) -> Self {
        let keys = keys
            .iter()
            .map(|(network, data)| StoredKey { network: *network, key: BASE64.encode(data) })
            .collect();
        Self { version: STORAGE_VERSION, keys }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let data: WalletData = serde_json::from_slice(bytes)?;
        if data.version != STORAGE_VERSION {
            return Err(Error::UnsupportedStorageVersion(data.version));
        }
        Ok(data)
    }

    /// Decoded per-network key material.
    pub fn keys(&self) -> Result<Vec<(Network, Vec<u8>)>> {
        self.keys
            .iter()
            .map(|stored| {
                let data = BASE64
                    .decode(&stored.key)
                    .map_err(|e| Error::Storage(e.to_string()))?;
                Ok((stored.network, data))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let keys = vec![
            (Network::BITCOIN, vec![1u8, 2, 3]),
            (Network::ETHEREUM, vec![4u8, 5]),
        ];
        let data = WalletData::new(&keys);
        let bytes = data.to_bytes().unwrap();

        let restored = WalletData::from_bytes(&bytes).unwrap();
        assert_eq!(restored.keys().unwrap(), keys);
    }

    #[test]
    fn test_unknown_version() {
        let json = br#"{"version":9,"keys":[]}"#;
        assert!(matches!(
            WalletData::from_bytes(json),
            Err(Error::UnsupportedStorageVersion(9))
        ));
    }

    #[test]
    fn test_garbage_input() {
        assert!(matches!(WalletData::from_bytes(b"not json"), Err(Error::Storage(_))));
    }
}
