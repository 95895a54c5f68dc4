//! Password sealing of the storage blob
//!
//! PBKDF2-HMAC-SHA512 key derivation plus ChaCha20-Poly1305 AEAD. The sealed
//! blob is `salt || nonce || ciphertext+tag`; every seal draws a fresh salt
//! and nonce.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::error::{Error, Result};

const PBKDF2_ITERATIONS: u32 = 19_162;
const SALT_SIZE: usize = 32;
const NONCE_SIZE: usize = 12;
const KEY_SIZE: usize = 32;
const TAG_SIZE: usize = 16;

/// Smallest valid sealed blob: metadata plus the AEAD tag of an empty payload
const MIN_SEALED_SIZE: usize = SALT_SIZE + NONCE_SIZE + TAG_SIZE;

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_SIZE] {
    let mut key = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha512>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key);
    key
}

/// Seal `data` under `password`.
pub fn encrypt(data: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let mut key = derive_key(password, &salt);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), data)
        .map_err(|_| Error::Storage("encryption failed".into()));
    key.zeroize();

    let ciphertext = ciphertext?;
    let mut output = Vec::with_capacity(MIN_SEALED_SIZE + data.len());
    output.extend_from_slice(&salt);
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Open a sealed blob. Fails with [`Error::WrongPassword`] on a bad password
/// or tampered ciphertext, [`Error::NotEnoughData`] on a truncated blob.
pub fn decrypt(data: &[u8], password: &str) -> Result<Vec<u8>> {
    if data.len() < MIN_SEALED_SIZE {
        return Err(Error::NotEnoughData);
    }

    let salt = &data[..SALT_SIZE];
    let nonce = &data[SALT_SIZE..SALT_SIZE + NONCE_SIZE];
    let ciphertext = &data[SALT_SIZE + NONCE_SIZE..];

    let mut key = derive_key(password, salt);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::WrongPassword);
    key.zeroize();

    plaintext
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let sealed = encrypt(b"key material", "password").unwrap();
        let opened = decrypt(&sealed, "password").unwrap();
        assert_eq!(opened, b"key material");
    }

    #[test]
    fn test_wrong_password() {
        let sealed = encrypt(b"key material", "password").unwrap();
        assert!(matches!(decrypt(&sealed, "other"), Err(Error::WrongPassword)));
    }

    #[test]
    fn test_tampered_ciphertext() {
        let mut sealed = encrypt(b"key material", "password").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0x01;
        assert!(matches!(decrypt(&sealed, "password"), Err(Error::WrongPassword)));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(
            decrypt(&[0u8; MIN_SEALED_SIZE - 1], "password"),
            Err(Error::NotEnoughData)
        ));
    }

    #[test]
    fn test_fresh_salt_per_seal() {
        let a = encrypt(b"same", "password").unwrap();
        let b = encrypt(b"same", "password").unwrap();
        assert_ne!(a, b);
    }
}
