//! Cardano keys
//!
//! ed25519-bip32 extended keys (derivation scheme V2) under
//! `m/44'/1815'/account'/change/address`. The root key is produced by
//! clamping the SHA-512 hash of the first half of the BIP39 seed.

use ed25519_bip32::{DerivationScheme, Signature, XPrv, SIGNATURE_SIZE, XPRV_SIZE};
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use crate::key::{EntropySize, Key as IKey, KeyError, KeyFactory as IKeyFactory};
use crate::key_path::{
    KeyPath as IKeyPath, KeyPathError, BIP44_PURPOSE, BIP44_SOFT_UPPER_BOUND,
};
use crate::network::Network;

/// Hardened BIP44 coin type for cardano
pub const COIN_TYPE: u32 = 0x8000_0717;

const SCHEME: DerivationScheme = DerivationScheme::V2;

/// A validated cardano key path (`m/44'/1815'/account'/change/address`).
#[derive(Debug, Copy, Clone)]
pub struct KeyPath {
    account: u32,
    change: u32,
    address: u32,
}

impl KeyPath {
    pub fn new(account: u32, change: u32, address: u32) -> Result<Self, KeyPathError> {
        if account >= BIP44_SOFT_UPPER_BOUND {
            return Err(KeyPathError::InvalidAccount(account));
        }
        if change != 0 && change != 1 {
            return Err(KeyPathError::InvalidChange(change));
        }
        if address >= BIP44_SOFT_UPPER_BOUND {
            return Err(KeyPathError::InvalidAddress(address));
        }
        Ok(Self { account: account + BIP44_SOFT_UPPER_BOUND, change, address })
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
        self.change
    }

    fn address(&self) -> u32 {
        self.address
    }
}

/// Cardano root key, pre-derived to `m/44'/1815'`.
pub struct Key {
    node: XPrv,
}

impl Key {
    pub fn from_data(data: &[u8]) -> Result<Self, KeyError> {
        if data.len() != XPRV_SIZE {
            return Err(KeyError::InvalidKeySize(data.len(), XPRV_SIZE));
        }
        let mut bytes = [0u8; XPRV_SIZE];
        bytes.copy_from_slice(data);

        let xprv = XPrv::from_bytes_verified(bytes)
            .map_err(|e| KeyError::InvalidKeyData(format!("{:?}", e)))?;
        Ok(Self { node: xprv.derive(SCHEME, BIP44_PURPOSE).derive(SCHEME, COIN_TYPE) })
    }

    pub fn data_from_seed(seed: &[u8]) -> Result<Vec<u8>, KeyError> {
        if seed.len() != 64 {
            return Err(KeyError::InvalidKeySize(seed.len(), 64));
        }

        let mut out = [0u8; XPRV_SIZE];
        let digest = Sha512::digest(&seed[..32]);
        out[..64].copy_from_slice(&digest);
        // ed25519 scalar clamping, with the third-highest bit cleared as the
        // cardano scheme requires
        out[0] &= 248;
        out[31] &= 63;
        out[31] |= 64;
        out[31] &= 0b1101_1111;
        out[64..].copy_from_slice(&seed[32..64]);

        let result = XPrv::from_bytes_verified(out)
            .map(|xprv| Vec::from(xprv.as_ref()))
            .map_err(|e| KeyError::InvalidKeyData(format!("{:?}", e)));
        out.zeroize();
        result
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
        Ok(self
            .node
            .derive(SCHEME, path.account())
            .derive(SCHEME, path.change())
            .derive(SCHEME, path.address()))
    }
}

impl IKey for Key {
    fn network(&self) -> Network {
        Network::CARDANO
    }

    fn pub_key(&self, path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        self.derive_private(path)
            .map(|xprv| xprv.public().public_key_slice().to_vec())
    }

    fn address(&self, path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        self.pub_key(path)
    }

    fn sign(&self, data: &[u8], path: &dyn IKeyPath) -> Result<Vec<u8>, KeyError> {
        self.derive_private(path).map(|xprv| {
            let signature: Signature<Vec<u8>> = xprv.sign(data);
            Vec::from(signature.as_ref())
        })
    }

    fn verify(&self, data: &[u8], signature: &[u8], path: &dyn IKeyPath) -> Result<bool, KeyError> {
        if signature.len() != SIGNATURE_SIZE {
            return Err(KeyError::InvalidSignatureSize(signature.len(), SIGNATURE_SIZE));
        }
        let mut bytes = [0u8; SIGNATURE_SIZE];
        bytes.copy_from_slice(signature);
        let signature: Signature<Vec<u8>> = Signature::from_bytes(bytes);

        self.derive_private(path)
            .map(|xprv| xprv.verify(data, &signature))
    }
}

/// Cardano key factory.
pub struct KeyFactory;

impl IKeyFactory for KeyFactory {
    fn network(&self) -> Network {
        Network::CARDANO
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
