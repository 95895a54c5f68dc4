//! Mnemonic phrase generation and handling

use bip39::Mnemonic;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Size of a BIP39 seed in bytes
pub const SEED_SIZE: usize = 64;

/// Mnemonic dictionary languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    English,
    French,
    Japanese,
    Korean,
    ChineseSimplified,
    ChineseTraditional,
    Italian,
    Spanish,
}

impl Language {
    fn to_bip39(self) -> bip39::Language {
        match self {
            Language::English => bip39::Language::English,
            Language::French => bip39::Language::French,
            Language::Japanese => bip39::Language::Japanese,
            Language::Korean => bip39::Language::Korean,
            Language::ChineseSimplified => bip39::Language::SimplifiedChinese,
            Language::ChineseTraditional => bip39::Language::TraditionalChinese,
            Language::Italian => bip39::Language::Italian,
            Language::Spanish => bip39::Language::Spanish,
        }
    }
}

/// Generate a random mnemonic with the given entropy strength in bits.
pub fn generate_mnemonic(entropy_bits: usize, language: Language) -> Result<String> {
    let mut entropy = vec![0u8; entropy_bits / 8];
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy_in(language.to_bip39(), &entropy)
        .map_err(|e| Error::Mnemonic(e.to_string()));
    entropy.zeroize();

    Ok(mnemonic?.to_string())
}

/// Validate a mnemonic phrase against the given dictionary.
pub fn validate_mnemonic(phrase: &str, language: Language) -> Result<()> {
    Mnemonic::parse_in_normalized(language.to_bip39(), phrase)
        .map(|_| ())
        .map_err(|e| Error::Mnemonic(e.to_string()))
}

/// Produce the BIP39 seed for a mnemonic phrase and optional passphrase.
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str, language: Language) -> Result<Vec<u8>> {
    let mnemonic = Mnemonic::parse_in_normalized(language.to_bip39(), phrase)
        .map_err(|e| Error::Mnemonic(e.to_string()))?;

    Ok(mnemonic.to_seed(passphrase).to_vec())
}
