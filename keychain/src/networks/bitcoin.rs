//! Bitcoin keys
//!
//! BIP32 secp256k1 extended keys under BIP44/49/84 paths. Signatures are
//! compact ECDSA over the double-SHA256 digest of the input.

use crate::crypto::bip32::{double_sha256, hash160, XPrv};
use crate::key::{EntropySize, Key as IKey, KeyError, KeyFactory as IKeyFactory};
use crate::key_path::{
    KeyPath as IKeyPath, KeyPathError, BIP44_PURPOSE, BIP44_SOFT_UPPER_BOUND,
};
use crate::network::Network;

/// Hardened coin type for mainnet
pub const COIN_TYPE: u32 = 0x8000_0000;

/// Hardened coin type for testnet
pub const COIN_TYPE_TESTNET: u32 = 0x8000_0001;

/// BIP49 purpose (`49'`)
pub const BIP49_PURPOSE: u32 = 0x8000_0031;

/// BIP84 purpose (`84'`)
pub const BIP84_PURPOSE: u32 = 0x8000_0054;

/// A validated bitcoin key path.
#[derive(Debug, Copy, Clone)]
pub struct KeyPath {
    purpose: u32,
    coin: u32,
    account: u32,
    change: u32,
    address: u32,
}

impl KeyPath {
    fn coin(testnet: bool) -> u32 {
        if testnet {
            COIN_TYPE_TESTNET
        } else {
            COIN_TYPE
        }
    }

    fn validate(account: u32, change: u32, address: u32) -> Result<(), KeyPathError> {
        if account >= BIP44_SOFT_UPPER_BOUND {
            return Err(KeyPathError::InvalidAccount(account));
        }
        if change != 0 && change != 1 {
            return Err(KeyPathError::InvalidChange(change));
        }
        if address >= BIP44_SOFT_UPPER_BOUND {
            return Err(KeyPathError::InvalidAddress(address));
        }
        Ok(())
    }

    fn with_purpose(
        purpose: u32,
        testnet: bool,
        account: u32,
        change: u32,
        address: u32,
    ) -> Result<Self, KeyPathError> {
        Self::validate(account, change, address)?;
        Ok(Self {
            purpose,
            coin: Self::coin(testnet),
            account: account + BIP44_SOFT_UPPER_BOUND,
            change,
            address,
        })
    }

    pub fn bip44(testnet: bool, account: u32, change: u32, address: u32) -> Result<Self, KeyPathError> {
        Self::with_purpose(BIP44_PURPOSE, testnet, account, change, address)
    }

    pub fn bip49(testnet: bool, account: u32, change: u32, address: u32) -> Result<Self, KeyPathError> {
        Self::with_purpose(BIP49_PURPOSE, testnet, account, change, address)
    }

    pub fn bip84(testnet: bool, account: u32, change: u32, address: u32) -> Result<Self, KeyPathError> {
        Self::with_purpose(BIP84_PURPOSE, testnet, account, change, address)
    }
}

impl IKeyPath for KeyPath {
    fn purpose(&self) -> u32 {
        self.purpose
    }

    fn coin(&self) -> u32 {
        self.coin
    }

    fn account(&self) -> u32 {
        self.account
    }

    fn change(&self) -> u32 {
        self.change
    }

    fn address(&self) -> u32 {
        self.address
    }
}

/// Bitcoin root key.
pub struct Key {
    xprv: XPrv,
}

impl Key {
    pub fn from_data(data: &[u8]) -> Result<Self, KeyError> {
        XPrv::from_data(data).map(|xprv| Self { xprv })
    }

    pub fn data_from_seed(seed: &[u8]) -> Result<Vec<u8>, KeyError> {
        XPrv::from_seed(seed).map(|xprv| xprv.serialize())
    }

    fn derive_private(&self, path: &dyn IKeyPath) -> Result<XPrv, KeyError> {
        if path.coin() != COIN_TYPE && path.coin() != COIN_TYPE_TESTNET {
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
        self.xprv
            .derive(path.purpose())?
            .derive(path.coin())?
            .derive(path.account())?
            .derive(path.change())?
            .derive(path.address())
    }
}

impl IKey for Key {
    fn network(&self) -> Network {
        Network::BITCOIN
    }

    fn pub_key(&self, path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        self.derive_private(path).map(|xprv| xprv.public().serialize())
    }

    fn address(&self, path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        self.derive_private(path)
            .map(|xprv| hash160(&xprv.public().serialize()).to_vec())
    }

    fn sign(&self, data: &[u8], path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        self.derive_private(path)?.sign_digest(&double_sha256(data))
    }

    fn verify(&self, data: &[u8], signature: &[u8], path: &dyn IKeyPath) -> Result<bool, KeyError> {
        self.derive_private(path)?
            .public()
            .verify_digest(&double_sha256(data), signature)
    }
}

/// Bitcoin key factory.
pub struct KeyFactory;

impl IKeyFactory for KeyFactory {
    fn network(&self) -> Network {
        Network::BITCOIN
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
