//! Per-network key implementations

#[cfg(feature = "bitcoin")]
pub mod bitcoin;

#[cfg(feature = "cardano")]
pub mod cardano;

#[cfg(feature = "ethereum")]
pub mod ethereum;

use crate::key::KeyFactory;

/// Factories for every network enabled in this build.
pub fn all_networks() -> Vec<Box<dyn KeyFactory>> {
    let mut networks: Vec<Box<dyn KeyFactory>> = Vec::new();
    #[cfg(feature = "bitcoin")]
    networks.push(bitcoin::KeyFactory.boxed());
    #[cfg(feature = "cardano")]
    networks.push(cardano::KeyFactory.boxed());
    #[cfg(feature = "ethereum")]
    networks.push(ethereum::KeyFactory.boxed());
    networks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_networks_are_distinct() {
        let factories = all_networks();
        assert_eq!(factories.len(), 3);

        let mut networks: Vec<_> = factories.iter().map(|f| f.network()).collect();
        networks.sort();
        networks.dedup();
        assert_eq!(networks.len(), factories.len());
    }
}
