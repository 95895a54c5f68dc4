//! BIP44 key paths
//!
//! Paths have the five-level form `m/purpose'/coin'/account'/change/address`.
//! Hardened components carry the BIP32 hardened bit in their numeric value.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// BIP44 purpose component (`44'`)
pub const BIP44_PURPOSE: u32 = 0x8000_002C;

/// First hardened index; soft derivation lives strictly below it
pub const BIP44_SOFT_UPPER_BOUND: u32 = 0x8000_0000;

/// Number of components in a textual path, including the `m` marker
pub const KEY_PATH_PARTS_COUNT: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyPathError {
    #[error("Invalid parts count {0}, expected {}", KEY_PATH_PARTS_COUNT)]
    InvalidPartsCount(usize),
    #[error("Invalid path marker '{0}', expected 'm'")]
    InvalidPathMarker(String),
    #[error("Invalid purpose {0:#010x}, expected {1:#010x}")]
    InvalidPurpose(u32, u32),
    #[error("Invalid coin {0:#010x}, expected {1:#010x}")]
    InvalidCoin(u32, u32),
    #[error("Invalid account {0}")]
    InvalidAccount(u32),
    #[error("Invalid change {0}")]
    InvalidChange(u32),
    #[error("Invalid address {0}")]
    InvalidAddress(u32),
    #[error("Found empty value at index {0}")]
    EmptyValueAtIndex(usize),
    #[error("Value {1} at index {0} is out of range")]
    ValueOutOfRangeAtIndex(usize, u32),
    #[error("Can't parse number at index {0}: {1}")]
    ParseErrorAtIndex(usize, std::num::ParseIntError),
}

/// A five-level BIP44 derivation path.
pub trait KeyPath {
    fn purpose(&self) -> u32;
    fn coin(&self) -> u32;
    fn account(&self) -> u32;
    fn change(&self) -> u32;
    fn address(&self) -> u32;
}

/// A network-agnostic key path parsed from its textual form.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GenericKeyPath {
    purpose: u32,
    coin: u32,
    account: u32,
    change: u32,
    address: u32,
}

impl GenericKeyPath {
    pub fn new(purpose: u32, coin: u32, account: u32, change: u32, address: u32) -> Self {
        Self { purpose, coin, account, change, address }
    }

    fn parse_component(index: usize, s: &str) -> Result<u32, KeyPathError> {
        if s.is_empty() {
            return Err(KeyPathError::EmptyValueAtIndex(index));
        }
        let (digits, hardened) = match s.strip_suffix('\'') {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if digits.is_empty() {
            return Err(KeyPathError::EmptyValueAtIndex(index));
        }
        let value = digits
            .parse::<u32>()
            .map_err(|err| KeyPathError::ParseErrorAtIndex(index, err))?;
        if hardened {
            // the hardened bit must still be free
            value
                .checked_add(BIP44_SOFT_UPPER_BOUND)
                .ok_or(KeyPathError::ValueOutOfRangeAtIndex(index, value))
        } else {
            Ok(value)
        }
    }

    fn print_component(value: u32) -> String {
        if value >= BIP44_SOFT_UPPER_BOUND {
            format!("{}'", value - BIP44_SOFT_UPPER_BOUND)
        } else {
            value.to_string()
        }
    }
}

impl FromStr for GenericKeyPath {
    type Err = KeyPathError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = path.split('/').map(str::trim).collect();
        if parts.len() != KEY_PATH_PARTS_COUNT {
            return Err(KeyPathError::InvalidPartsCount(parts.len()));
        }
        if parts[0] != "m" {
            return Err(KeyPathError::InvalidPathMarker(parts[0].to_owned()));
        }
        Ok(Self {
            purpose: Self::parse_component(1, parts[1])?,
            coin: Self::parse_component(2, parts[2])?,
            account: Self::parse_component(3, parts[3])?,
            change: Self::parse_component(4, parts[4])?,
            address: Self::parse_component(5, parts[5])?,
        })
    }
}

// Display is the exact inverse of FromStr.
impl fmt::Display for GenericKeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m/{}/{}/{}/{}/{}",
            Self::print_component(self.purpose),
            Self::print_component(self.coin),
            Self::print_component(self.account),
            Self::print_component(self.change),
            Self::print_component(self.address)
        )
    }
}

impl KeyPath for GenericKeyPath {
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
