//! Cryptographic building blocks
//!
//! Mnemonic handling, secp256k1 extended keys and the password cipher that
//! seals the storage blob.

pub mod bip32;
pub mod cipher;
pub mod mnemonic;
