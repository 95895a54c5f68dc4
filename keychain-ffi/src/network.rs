//! Network identifiers at the ABI boundary

use keychain::Network as RNetwork;

/// A network code as foreign callers see it.
///
/// Only the exported constants are valid; every entry point accepting a raw
/// `Network` validates it against the closed set.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Network(pub u32);

#[no_mangle]
pub static NETWORK_BITCOIN: Network = Network(RNetwork::BITCOIN.0);

#[no_mangle]
pub static NETWORK_CARDANO: Network = Network(RNetwork::CARDANO.0);

#[no_mangle]
pub static NETWORK_ETHEREUM: Network = Network(RNetwork::ETHEREUM.0);

impl From<Network> for RNetwork {
    fn from(network: Network) -> Self {
        RNetwork(network.0)
    }
}

impl From<RNetwork> for Network {
    fn from(network: RNetwork) -> Self {
        Network(network.0)
    }
}

/// Check a raw network code against the supported set.
#[no_mangle]
pub extern "C" fn network_is_supported(network: Network) -> bool {
    RNetwork::from_code(network.0).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_are_distinct() {
        assert_ne!(NETWORK_BITCOIN.0, NETWORK_CARDANO.0);
        assert_ne!(NETWORK_BITCOIN.0, NETWORK_ETHEREUM.0);
        assert_ne!(NETWORK_CARDANO.0, NETWORK_ETHEREUM.0);
    }

    #[test]
    fn test_validation() {
        assert!(network_is_supported(NETWORK_BITCOIN));
        assert!(network_is_supported(NETWORK_CARDANO));
        assert!(network_is_supported(NETWORK_ETHEREUM));
        assert!(!network_is_supported(Network(0)));
        assert!(!network_is_supported(Network(u32::MAX)));
    }
}
