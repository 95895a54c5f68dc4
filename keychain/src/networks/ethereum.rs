//! Ethereum keys
//!
//! BIP32 secp256k1 extended keys fixed to `m/44'/60'`. Signatures are
//! compact ECDSA over the Keccak-256 digest of the input; addresses are the
//! trailing 20 bytes of the Keccak-256 hash of the uncompressed public key.

use sha3::{Digest, Keccak256};

use crate::crypto::bip32::XPrv;
use crate::key::{EntropySize, Key as IKey, KeyError, KeyFactory as IKeyFactory};
use crate::key_path::{
    KeyPath as IKeyPath, KeyPathError, BIP44_PURPOSE, BIP44_SOFT_UPPER_BOUND,
};
use crate::network::Network;

/// Hardened BIP44 coin type for ethereum
pub const COIN_TYPE: u32 = 0x8000_003C;

/// A validated ethereum key path (`m/44'/60'/account'/0/address`).
#[derive(Debug, Copy, Clone)]
pub struct KeyPath {
    account: u32,
    address: u32,
}

impl KeyPath {
    /// One account per index, first address.
    pub fn new(account: u32) -> Result<Self, KeyPathError> {
        if account >= BIP44_SOFT_UPPER_BOUND {
            return Err(KeyPathError::InvalidAccount(account));
        }
        Ok(Self { account: account + BIP44_SOFT_UPPER_BOUND, address: 0 })
    }

    /// Metamask-style: single account, one address per index.
    pub fn metamask(address: u32) -> Result<Self, KeyPathError> {
        if address >= BIP44_SOFT_UPPER_BOUND {
            return Err(KeyPathError::InvalidAddress(address));
        }
        Ok(Self { account: BIP44_SOFT_UPPER_BOUND, address })
    }
}

impl IKeyPath for KeyPath {
    fn purpose(&self) -> u32 {
        BIP44_PURPOSE
    }

    fn coin(&self) -> u32 {
        COIN_TYPE
    }

    fn account(&self) -> u32 {
        self.account
    }

    fn change(&self) -> u32 {
        0
    }

    fn address(&self) -> u32 {
        self.address
    }
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Ethereum root key, pre-derived to `m/44'/60'`.
pub struct Key {
    node: XPrv,
}

impl Key {
    pub fn from_data(data: &[u8]) -> Result<Self, KeyError> {
        let node = XPrv::from_data(data)?
            .derive(BIP44_PURPOSE)?
            .derive(COIN_TYPE)?;
        Ok(Self { node })
    }

    pub fn data_from_seed(seed: &[u8]) -> Result<Vec<u8>, KeyError> {
        XPrv::from_seed(seed).map(|xprv| xprv.serialize())
    }

    fn derive_private(&self, path: &dyn IKeyPath) -> Result<XPrv, KeyError> {
        if path.purpose() != BIP44_PURPOSE {
            return Err(KeyPathError::InvalidPurpose(path.purpose(), BIP44_PURPOSE).into());
        }
        if path.coin() != COIN_TYPE {
            return Err(KeyPathError::InvalidCoin(path.coin(), COIN_TYPE).into());
        }
        if path.account() < BIP44_SOFT_UPPER_BOUND {
            return Err(KeyPathError::InvalidAccount(path.account()).into());
        }
        if path.change() != 0 && path.change() != 1 {
            return Err(KeyPathError::InvalidChange(path.change()).into());
        }
        if path.address() >= BIP44_SOFT_UPPER_BOUND {
            return Err(KeyPathError::InvalidAddress(path.address()).into());
        }
        self.node
            .derive(path.account())?
            .derive(path.change())?
            .derive(path.address())
    }
}

impl IKey for Key {
    fn network(&self) -> Network {
        Network::ETHEREUM
    }

    fn pub_key(&self, path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        self.derive_private(path).map(|xprv| xprv.public().serialize())
    }

    fn address(&self, path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        let uncompressed = self.derive_private(path)?.public().serialize_uncompressed();
        let hash = keccak256(&uncompressed[1..]);
        Ok(hash[12..].to_vec())
    }

    fn sign(&self, data: &[u8], path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        self.derive_private(path)?.sign_digest(&keccak256(data))
    }

    fn verify(&self, data: &[u8], signature: &[u8], path: &dyn IKeyPath) -> Result<bool, KeyError> {
        self.derive_private(path)?
            .public()
            .verify_digest(&keccak256(data), signature)
    }
}

/// Ethereum key factory.
pub struct KeyFactory;

impl IKeyFactory for KeyFactory {
    fn network(&self) -> Network {
        Network::ETHEREUM
    }

    fn entropy_size(&self) -> EntropySize {
        EntropySize { min: 128, max: 256 }
    }

    fn key_from_data(&self, data: &[u8]) -> Result<Box<dyn IKey>, KeyError> {
        Key::from_data(data).map(|key| key.boxed())
    }

    fn key_data_from_seed(&self, seed: &[u8]) -> Result<Vec<u8>, KeyError> {
        Key::data_from_seed(seed)
    }
}
