//! Keychain manager
//!
//! The single owning entry point of the library. Construction is fallible:
//! the manager probes the OS entropy source and reconciles the entropy
//! requirements of every registered network before it accepts work.

use std::collections::HashMap;

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::crypto::cipher;
use crate::crypto::mnemonic::{
    generate_mnemonic, mnemonic_to_seed, Language, SEED_SIZE,
};
use crate::error::{Error, Result};
use crate::key::KeyFactory;
use crate::keychain::Keychain;
use crate::network::Network;
use crate::networks::all_networks;
use crate::storage::WalletData;

/// Owner of the per-network key factories.
///
/// Every constructor produces an independent instance; instances share no
/// state and are not internally synchronized.
pub struct KeychainManager {
    factories: HashMap<Network, Box<dyn KeyFactory>>,
    entropy_bits: usize,
}

impl KeychainManager {
    /// Create a manager for every network enabled in this build.
    pub fn new() -> Result<Self> {
        Self::with_factories(all_networks())
    }

    /// Create a manager restricted to the given networks.
    ///
    /// Unknown networks are rejected rather than silently dropped.
    pub fn with_networks(networks: &[Network]) -> Result<Self> {
        let mut factories = all_networks();
        for network in networks {
            if !factories.iter().any(|factory| factory.network() == *network) {
                return Err(Error::NetworkIsNotSupported(*network));
            }
        }
        factories.retain(|factory| networks.contains(&factory.network()));
        Self::with_factories(factories)
    }

    /// Networks this manager can derive keys for.
    pub fn networks(&self) -> Vec<Network> {
        let mut networks: Vec<Network> = self.factories.keys().copied().collect();
        networks.sort();
        networks
    }

    pub fn has_network(&self, network: &Network) -> bool {
        self.factories.contains_key(network)
    }

    pub fn key_factory(&self, network: &Network) -> Option<&dyn KeyFactory> {
        self.factories.get(network).map(|factory| factory.as_ref())
    }

    /// Generate a fresh mnemonic with the entropy strength negotiated across
    /// the registered networks.
    pub fn generate_mnemonic(&self, language: Option<Language>) -> Result<String> {
        generate_mnemonic(self.entropy_bits, language.unwrap_or_default())
    }

    /// Derive one key per registered network from a BIP39 seed and return the
    /// opened keychain together with the sealed storage blob.
    pub fn keychain_from_seed(&self, seed: &[u8], password: &str) -> Result<(Keychain, Vec<u8>)> {
        if seed.len() != SEED_SIZE {
            return Err(Error::InvalidSeedSize(seed.len(), SEED_SIZE));
        }

        let mut keys = Vec::with_capacity(self.factories.len());
        let mut stored = Vec::with_capacity(self.factories.len());
        for factory in self.factories.values() {
            let network = factory.network();
            let data = factory
                .key_data_from_seed(seed)
                .map_err(|err| Error::from_key_error(&network, err))?;
            let key = factory
                .key_from_data(&data)
                .map_err(|err| Error::from_key_error(&network, err))?;
            keys.push(key);
            stored.push((network, data));
        }

        let mut plaintext = WalletData::new(&stored).to_bytes()?;
        for (_, data) in stored.iter_mut() {
            data.zeroize();
        }
        let sealed = cipher::encrypt(&plaintext, password);
        plaintext.zeroize();

        debug!(networks = self.factories.len(), "derived keychain from seed");
        Ok((Keychain::new(keys), sealed?))
    }

    /// Derive a keychain from a mnemonic phrase.
    pub fn keychain_from_mnemonic(
        &self,
        mnemonic: &str,
        password: &str,
        language: Option<Language>,
    ) -> Result<(Keychain, Vec<u8>)> {
        let mut seed = mnemonic_to_seed(mnemonic, "", language.unwrap_or_default())?;
        let result = self.keychain_from_seed(&seed, password);
        seed.zeroize();
        result
    }

    /// Restore a keychain from a sealed storage blob.
    ///
    /// Keys for networks this manager was not built with are left sealed.
    pub fn keychain_from_data(&self, data: &[u8], password: &str) -> Result<Keychain> {
        let mut plaintext = cipher::decrypt(data, password)?;
        let wallet = WalletData::from_bytes(&plaintext);
        plaintext.zeroize();

        let mut keys = Vec::new();
        for (network, mut key_data) in wallet?.keys()? {
            if let Some(factory) = self.factories.get(&network) {
                let key = factory
                    .key_from_data(&key_data)
                    .map_err(|err| Error::from_key_error(&network, err))?;
                keys.push(key);
            } else {
                warn!(%network, "skipping key for unregistered network");
            }
            key_data.zeroize();
        }

        debug!(keys = keys.len(), "restored keychain from storage");
        Ok(Keychain::new(keys))
    }

    /// Re-seal a storage blob under a new password.
    pub fn change_password(
        &self,
        sealed: &[u8],
        old_password: &str,
        new_password: &str,
    ) -> Result<Vec<u8>> {
        let mut plaintext = cipher::decrypt(sealed, old_password)?;
        let resealed = cipher::encrypt(&plaintext, new_password);
        plaintext.zeroize();
        resealed
    }

    /// Export the raw per-network key material from a sealed blob.
    pub fn keys_data(&self, sealed: &[u8], password: &str) -> Result<Vec<(Network, Vec<u8>)>> {
        let mut plaintext = cipher::decrypt(sealed, password)?;
        let wallet = WalletData::from_bytes(&plaintext);
        plaintext.zeroize();
        wallet?.keys()
    }
}

// Construction internals
impl KeychainManager {
    fn with_factories(factories: Vec<Box<dyn KeyFactory>>) -> Result<Self> {
        let entropy_bits = Self::reconcile_entropy(&factories)?;
        Self::probe_entropy_source()?;

        let factories: HashMap<Network, Box<dyn KeyFactory>> = factories
            .into_iter()
            .map(|factory| (factory.network(), factory))
            .collect();

        debug!(networks = factories.len(), entropy_bits, "keychain manager ready");
        Ok(Self { factories, entropy_bits })
    }

    /// The smallest entropy strength every registered network accepts.
    fn reconcile_entropy(factories: &[Box<dyn KeyFactory>]) -> Result<usize> {
        let mut min = 0usize;
        let mut max = usize::MAX;
        for factory in factories {
            let size = factory.entropy_size();
            min = min.max(size.min);
            max = max.min(size.max);
        }
        if min == 0 || max < min {
            return Err(Error::CantCalculateEntropySize(min, max));
        }
        Ok(min)
    }

    /// Fail construction early if the OS entropy source is unusable.
    fn probe_entropy_source() -> Result<()> {
        let mut probe = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut probe)
            .map_err(|err| Error::EntropyUnavailable(err.to_string()))?;
        probe.zeroize();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let manager = KeychainManager::new().unwrap();
        assert_eq!(
            manager.networks(),
            vec![Network::BITCOIN, Network::ETHEREUM, Network::CARDANO]
        );
        assert!(manager.has_network(&Network::BITCOIN));
        assert!(!manager.has_network(&Network(42)));
    }

    #[test]
    fn test_with_networks_subset() {
        let manager = KeychainManager::with_networks(&[Network::ETHEREUM]).unwrap();
        assert_eq!(manager.networks(), vec![Network::ETHEREUM]);
        assert!(manager.key_factory(&Network::ETHEREUM).is_some());
        assert!(manager.key_factory(&Network::BITCOIN).is_none());
    }

    #[test]
    fn test_with_networks_rejects_unknown() {
        assert!(matches!(
            KeychainManager::with_networks(&[Network(42)]),
            Err(Error::NetworkIsNotSupported(Network(42)))
        ));
    }

    #[test]
    fn test_with_networks_rejects_empty() {
        assert!(matches!(
            KeychainManager::with_networks(&[]),
            Err(Error::CantCalculateEntropySize(0, _))
        ));
    }

    #[test]
    fn test_generate_mnemonic() {
        let manager = KeychainManager::new().unwrap();
        let mnemonic = manager.generate_mnemonic(None).unwrap();
        assert_eq!(mnemonic.split_whitespace().count(), 12);
    }
}
