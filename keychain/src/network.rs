//! Network identifiers
//!
//! A [`Network`] is a closed-set identifier distinguishing which blockchain's
//! key and path rules apply to a given operation. The code is the hardened
//! BIP44 coin type of the network, which keeps the identifier stable across
//! every boundary the value crosses.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of a supported blockchain network.
///
/// The inner value is the hardened BIP44 coin type. Only the associated
/// constants are valid; any other code must be rejected via [`Network::from_code`].
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Network(pub u32);

impl Network {
    pub const BITCOIN: Network = Network(0x8000_0000);
    pub const ETHEREUM: Network = Network(0x8000_003C);
    pub const CARDANO: Network = Network(0x8000_0717);

    /// All networks this build of the library knows about.
    pub const ALL: [Network; 3] = [Network::BITCOIN, Network::ETHEREUM, Network::CARDANO];

    /// Raw network code.
    pub fn code(&self) -> u32 {
        self.0
    }

    /// Validate a raw code coming from outside the library.
    pub fn from_code(code: u32) -> Result<Network> {
        let network = Network(code);
        if Self::ALL.contains(&network) {
            Ok(network)
        } else {
            Err(Error::NetworkIsNotSupported(network))
        }
    }

    fn name(&self) -> Option<&'static str> {
        match *self {
            Network::BITCOIN => Some("bitcoin"),
            Network::ETHEREUM => Some("ethereum"),
            Network::CARDANO => Some("cardano"),
            _ => None,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "unknown({:#010x})", self.0),
        }
    }
}
