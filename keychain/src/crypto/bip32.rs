//! BIP32 extended secp256k1 keys
//!
//! Master key derivation from a BIP39 seed, hardened and normal child
//! derivation, and a checksummed serialization used by the storage blob.
//! Signing operates on a 32-byte digest supplied by the network layer.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Scalar, Secp256k1, SecretKey};
use sha2::{Digest, Sha256, Sha512};
use zeroize::Zeroize;

use crate::key::KeyError;
use crate::key_path::BIP44_SOFT_UPPER_BOUND;

const HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Compact ECDSA signature size
pub const SIGNATURE_SIZE: usize = 64;

mod layout {
    pub const DEPTH_SIZE: usize = 1;
    pub const FINGERPRINT_SIZE: usize = 4;
    pub const INDEX_SIZE: usize = 4;
    pub const CHAIN_CODE_SIZE: usize = 32;
    pub const KEY_SIZE: usize = 32;
    pub const CHECKSUM_SIZE: usize = 4;

    pub const KEY_DATA_SIZE: usize =
        DEPTH_SIZE + FINGERPRINT_SIZE + INDEX_SIZE + CHAIN_CODE_SIZE + KEY_SIZE + CHECKSUM_SIZE;

    pub const DEPTH_START: usize = 0;
    pub const FINGERPRINT_START: usize = DEPTH_START + DEPTH_SIZE;
    pub const INDEX_START: usize = FINGERPRINT_START + FINGERPRINT_SIZE;
    pub const CHAIN_CODE_START: usize = INDEX_START + INDEX_SIZE;
    pub const KEY_START: usize = CHAIN_CODE_START + CHAIN_CODE_SIZE;
    pub const CHECKSUM_START: usize = KEY_START + KEY_SIZE;
}

/// Serialized extended key size
pub const KEY_DATA_SIZE: usize = layout::KEY_DATA_SIZE;

/// An extended secp256k1 private key.
pub struct XPrv {
    key: SecretKey,
    chain_code: [u8; layout::CHAIN_CODE_SIZE],
    parent_fingerprint: [u8; layout::FINGERPRINT_SIZE],
    depth: u8,
    index: u32,
}

impl XPrv {
    /// Derive the BIP32 master key from a BIP39 seed.
    pub fn from_seed(seed: &[u8]) -> Result<Self, KeyError> {
        let mut hmac = <Hmac<Sha512> as Mac>::new_from_slice(HMAC_KEY)
            .map_err(|e| KeyError::InvalidKeyData(e.to_string()))?;
        hmac.update(seed);
        let mut result = hmac.finalize().into_bytes();

        let key = SecretKey::from_slice(&result[..layout::KEY_SIZE])
            .map_err(|e| KeyError::InvalidKeyData(e.to_string()))?;
        let mut chain_code = [0u8; layout::CHAIN_CODE_SIZE];
        chain_code.copy_from_slice(&result[layout::KEY_SIZE..]);
        result.as_mut_slice().zeroize();

        Ok(Self {
            key,
            chain_code,
            parent_fingerprint: [0u8; layout::FINGERPRINT_SIZE],
            depth: 0,
            index: 0,
        })
    }

    /// Restore an extended key from its serialized form, verifying the checksum.
    pub fn from_data(data: &[u8]) -> Result<Self, KeyError> {
        use self::layout::*;

        if data.len() != KEY_DATA_SIZE {
            return Err(KeyError::InvalidKeySize(data.len(), KEY_DATA_SIZE));
        }

        let checksum = double_sha256(&data[DEPTH_START..CHECKSUM_START]);
        if data[CHECKSUM_START..] != checksum[..CHECKSUM_SIZE] {
            return Err(KeyError::InvalidKeyData("checksum mismatch".into()));
        }

        let depth = data[DEPTH_START];
        let mut parent_fingerprint = [0u8; FINGERPRINT_SIZE];
        parent_fingerprint.copy_from_slice(&data[FINGERPRINT_START..INDEX_START]);
        let mut index_bytes = [0u8; INDEX_SIZE];
        index_bytes.copy_from_slice(&data[INDEX_START..CHAIN_CODE_START]);
        let index = u32::from_be_bytes(index_bytes);
        let mut chain_code = [0u8; CHAIN_CODE_SIZE];
        chain_code.copy_from_slice(&data[CHAIN_CODE_START..KEY_START]);
        let key = SecretKey::from_slice(&data[KEY_START..CHECKSUM_START])
            .map_err(|e| KeyError::InvalidKeyData(e.to_string()))?;

        Ok(Self { key, chain_code, parent_fingerprint, depth, index })
    }

    /// Serialize with a trailing double-SHA256 checksum.
    pub fn serialize(&self) -> Vec<u8> {
        use self::layout::*;

        let mut data = Vec::with_capacity(KEY_DATA_SIZE);
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.index.to_be_bytes());
        data.extend_from_slice(&self.chain_code);
        data.extend_from_slice(&self.key.secret_bytes());

        let checksum = double_sha256(&data);
        data.extend_from_slice(&checksum[..CHECKSUM_SIZE]);
        data
    }

    /// Derive the child key at `index` (hardened if the hardened bit is set).
    pub fn derive(&self, index: u32) -> Result<Self, KeyError> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| KeyError::InvalidKeyData("derivation depth exhausted".into()))?;

        let secp = Secp256k1::new();

        let mut data = Vec::with_capacity(37);
        if index >= BIP44_SOFT_UPPER_BOUND {
            data.push(0);
            data.extend_from_slice(&self.key.secret_bytes());
        } else {
            let public = PublicKey::from_secret_key(&secp, &self.key);
            data.extend_from_slice(&public.serialize());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let mut hmac = <Hmac<Sha512> as Mac>::new_from_slice(&self.chain_code)
            .map_err(|e| KeyError::InvalidKeyData(e.to_string()))?;
        hmac.update(&data);
        data.zeroize();
        let mut result = hmac.finalize().into_bytes();

        // child = (IL + parent) mod n
        let child_key = SecretKey::from_slice(&result[..layout::KEY_SIZE])
            .and_then(|key| key.add_tweak(&Scalar::from(self.key)))
            .map_err(|e| KeyError::InvalidKeyData(e.to_string()))?;
        let mut chain_code = [0u8; layout::CHAIN_CODE_SIZE];
        chain_code.copy_from_slice(&result[layout::KEY_SIZE..]);
        result.as_mut_slice().zeroize();

        let parent_public = PublicKey::from_secret_key(&secp, &self.key);
        let fingerprint = hash160(&parent_public.serialize());
        let mut parent_fingerprint = [0u8; layout::FINGERPRINT_SIZE];
        parent_fingerprint.copy_from_slice(&fingerprint[..layout::FINGERPRINT_SIZE]);

        Ok(Self {
            key: child_key,
            chain_code,
            parent_fingerprint,
            depth,
            index,
        })
    }

    pub fn public(&self) -> XPub {
        let secp = Secp256k1::new();
        XPub(PublicKey::from_secret_key(&secp, &self.key))
    }

    /// Sign a 32-byte digest, returning a 64-byte compact signature.
    pub fn sign_digest(&self, digest: &[u8; 32]) -> Result<Vec<u8>, KeyError> {
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(digest)
            .map_err(|e| KeyError::Signing(e.to_string()))?;
        Ok(secp.sign_ecdsa(&message, &self.key).serialize_compact().to_vec())
    }
}

/// An extended secp256k1 public key.
pub struct XPub(PublicKey);

impl XPub {
    /// Compressed SEC1 encoding (33 bytes).
    pub fn serialize(&self) -> Vec<u8> {
        self.0.serialize().to_vec()
    }

    /// Uncompressed SEC1 encoding (65 bytes).
    pub fn serialize_uncompressed(&self) -> Vec<u8> {
        self.0.serialize_uncompressed().to_vec()
    }

    /// Verify a 64-byte compact signature over a 32-byte digest.
    pub fn verify_digest(&self, digest: &[u8; 32], signature: &[u8]) -> Result<bool, KeyError> {
        if signature.len() != SIGNATURE_SIZE {
            return Err(KeyError::InvalidSignatureSize(signature.len(), SIGNATURE_SIZE));
        }
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(digest)
            .map_err(|e| KeyError::Signing(e.to_string()))?;
        let signature = Signature::from_compact(signature)
            .map_err(|e| KeyError::InvalidKeyData(e.to_string()))?;
        Ok(secp.verify_ecdsa(&message, &signature, &self.0).is_ok())
    }
}

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

/// SHA256(SHA256(data))
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP32 test vector 1
    const SEED: &str = "000102030405060708090a0b0c0d0e0f";

    #[test]
    fn test_vector_1_master() {
        let seed = hex::decode(SEED).unwrap();
        let master = XPrv::from_seed(&seed).unwrap();
        assert_eq!(
            hex::encode(master.public().serialize()),
            "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2"
        );
    }

    #[test]
    fn test_vector_1_hardened_child() {
        let seed = hex::decode(SEED).unwrap();
        let master = XPrv::from_seed(&seed).unwrap();
        // m/0'
        let child = master.derive(BIP44_SOFT_UPPER_BOUND).unwrap();
        assert_eq!(
            hex::encode(child.public().serialize()),
            "035a784662a4a20a65bf6aab9ae98a6c068a81c52e4b032c0fb5400c706cfccc56"
        );
    }

    #[test]
    fn test_serialize_roundtrip() {
        let seed = hex::decode(SEED).unwrap();
        let master = XPrv::from_seed(&seed).unwrap();
        let child = master.derive(BIP44_SOFT_UPPER_BOUND).unwrap().derive(1).unwrap();

        let data = child.serialize();
        assert_eq!(data.len(), KEY_DATA_SIZE);

        let restored = XPrv::from_data(&data).unwrap();
        assert_eq!(restored.public().serialize(), child.public().serialize());

        // corrupting any byte must break the checksum
        let mut bad = data.clone();
        bad[10] ^= 0xff;
        assert!(XPrv::from_data(&bad).is_err());
    }

    #[test]
    fn test_derive_at_max_depth() {
        let seed = hex::decode(SEED).unwrap();
        let master = XPrv::from_seed(&seed).unwrap();

        // forge a serialized key at the maximal depth
        let mut data = master.serialize();
        data[0] = u8::MAX;
        let checksum = double_sha256(&data[..KEY_DATA_SIZE - layout::CHECKSUM_SIZE]);
        data[KEY_DATA_SIZE - layout::CHECKSUM_SIZE..]
            .copy_from_slice(&checksum[..layout::CHECKSUM_SIZE]);

        let deep = XPrv::from_data(&data).unwrap();
        assert!(matches!(deep.derive(0), Err(KeyError::InvalidKeyData(_))));
    }

    #[test]
    fn test_sign_verify_digest() {
        let seed = hex::decode(SEED).unwrap();
        let key = XPrv::from_seed(&seed).unwrap();
        let digest = double_sha256(b"some message");

        let signature = key.sign_digest(&digest).unwrap();
        assert_eq!(signature.len(), SIGNATURE_SIZE);
        assert!(key.public().verify_digest(&digest, &signature).unwrap());

        let other = double_sha256(b"other message");
        assert!(!key.public().verify_digest(&other, &signature).unwrap());

        assert!(matches!(
            key.public().verify_digest(&digest, &signature[..32]),
            Err(KeyError::InvalidSignatureSize(32, SIGNATURE_SIZE))
        ));
    }
}
