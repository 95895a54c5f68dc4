//! Per-network key dispatch

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::key::Key;
use crate::key_path::KeyPath;
use crate::network::Network;

/// An opened keychain: one root key per network.
///
/// Built by [`crate::KeychainManager`]; immutable once constructed.
pub struct Keychain {
    keys: HashMap<Network, Box<dyn Key>>,
}

impl Keychain {
    pub(crate) fn new(keys: Vec<Box<dyn Key>>) -> Self {
        let keys = keys.into_iter().map(|key| (key.network(), key)).collect();
        Self { keys }
    }

    /// Networks this keychain holds keys for.
    pub fn networks(&self) -> Vec<Network> {
        let mut networks: Vec<Network> = self.keys.keys().copied().collect();
        networks.sort();
        networks
    }

    pub fn pub_key(&self, network: &Network, path: &dyn KeyPath) -> Result<Vec<u8>> {
        self.key(network)?
            .pub_key(path)
            .map_err(|err| Error::from_key_error(network, err))
    }

    pub fn address(&self, network: &Network, path: &dyn KeyPath) -> Result<Vec<u8>> {
        self.key(network)?
            .address(path)
            .map_err(|err| Error::from_key_error(network, err))
    }

    pub fn sign(&self, network: &Network, data: &[u8], path: &dyn KeyPath) -> Result<Vec<u8>> {
        self.key(network)?
            .sign(data, path)
            .map_err(|err| Error::from_key_error(network, err))
    }

    pub fn verify(
        &self,
        network: &Network,
        data: &[u8],
        signature: &[u8],
        path: &dyn KeyPath,
    ) -> Result<bool> {
        self.key(network)?
            .verify(data, signature, path)
            .map_err(|err| Error::from_key_error(network, err))
    }

    fn key(&self, network: &Network) -> Result<&dyn Key> {
        self.keys
            .get(network)
            .map(|key| key.as_ref())
            .ok_or(Error::KeyDoesNotExist(*network))
    }
}
