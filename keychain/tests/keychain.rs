//! End-to-end tests: mnemonic -> keychain -> sealed blob -> keychain

use keychain::networks::{bitcoin, cardano, ethereum};
use keychain::{Error, KeychainManager, Network};

const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
const PASSWORD: &str = "correct horse battery staple";

#[test]
fn test_keychain_from_mnemonic() {
    let manager = KeychainManager::new().unwrap();
    let (keychain, sealed) = manager
        .keychain_from_mnemonic(MNEMONIC, PASSWORD, None)
        .unwrap();

    assert_eq!(
        keychain.networks(),
        vec![Network::BITCOIN, Network::ETHEREUM, Network::CARDANO]
    );
    assert!(!sealed.is_empty());
}

#[test]
fn test_storage_roundtrip() {
    let manager = KeychainManager::new().unwrap();
    let (keychain, sealed) = manager
        .keychain_from_mnemonic(MNEMONIC, PASSWORD, None)
        .unwrap();

    let restored = manager.keychain_from_data(&sealed, PASSWORD).unwrap();
    assert_eq!(restored.networks(), keychain.networks());

    let path = ethereum::KeyPath::metamask(0).unwrap();
    assert_eq!(
        restored.pub_key(&Network::ETHEREUM, &path).unwrap(),
        keychain.pub_key(&Network::ETHEREUM, &path).unwrap()
    );
}

#[test]
fn test_deterministic_across_managers() {
    let a = KeychainManager::new().unwrap();
    let b = KeychainManager::new().unwrap();

    let (keychain_a, _) = a.keychain_from_mnemonic(MNEMONIC, "pw-a", None).unwrap();
    let (keychain_b, _) = b.keychain_from_mnemonic(MNEMONIC, "pw-b", None).unwrap();

    let path = bitcoin::KeyPath::bip44(false, 0, 0, 0).unwrap();
    assert_eq!(
        keychain_a.pub_key(&Network::BITCOIN, &path).unwrap(),
        keychain_b.pub_key(&Network::BITCOIN, &path).unwrap()
    );
}

#[test]
fn test_sign_verify_every_network() {
    let manager = KeychainManager::new().unwrap();
    let (keychain, _) = manager
        .keychain_from_mnemonic(MNEMONIC, PASSWORD, None)
        .unwrap();
    let data = b"payload to sign";

    let btc_path = bitcoin::KeyPath::bip44(false, 0, 0, 0).unwrap();
    let signature = keychain.sign(&Network::BITCOIN, data, &btc_path).unwrap();
    assert!(keychain.verify(&Network::BITCOIN, data, &signature, &btc_path).unwrap());

    let eth_path = ethereum::KeyPath::new(0).unwrap();
    let signature = keychain.sign(&Network::ETHEREUM, data, &eth_path).unwrap();
    assert!(keychain.verify(&Network::ETHEREUM, data, &signature, &eth_path).unwrap());

    let ada_path = cardano::KeyPath::new(0, 0, 0).unwrap();
    let signature = keychain.sign(&Network::CARDANO, data, &ada_path).unwrap();
    assert!(keychain.verify(&Network::CARDANO, data, &signature, &ada_path).unwrap());
}

#[test]
fn test_wrong_password() {
    let manager = KeychainManager::new().unwrap();
    let (_, sealed) = manager
        .keychain_from_mnemonic(MNEMONIC, PASSWORD, None)
        .unwrap();

    assert!(matches!(
        manager.keychain_from_data(&sealed, "wrong"),
        Err(Error::WrongPassword)
    ));
}

#[test]
fn test_truncated_blob() {
    let manager = KeychainManager::new().unwrap();
    assert!(matches!(
        manager.keychain_from_data(&[1, 2, 3], PASSWORD),
        Err(Error::NotEnoughData)
    ));
}

#[test]
fn test_change_password() {
    let manager = KeychainManager::new().unwrap();
    let (keychain, sealed) = manager
        .keychain_from_mnemonic(MNEMONIC, PASSWORD, None)
        .unwrap();

    let resealed = manager.change_password(&sealed, PASSWORD, "new password").unwrap();
    assert!(matches!(
        manager.keychain_from_data(&resealed, PASSWORD),
        Err(Error::WrongPassword)
    ));

    let restored = manager.keychain_from_data(&resealed, "new password").unwrap();
    assert_eq!(restored.networks(), keychain.networks());
}

#[test]
fn test_subset_manager_restores_partial_keychain() {
    let full = KeychainManager::new().unwrap();
    let (_, sealed) = full.keychain_from_mnemonic(MNEMONIC, PASSWORD, None).unwrap();

    let eth_only = KeychainManager::with_networks(&[Network::ETHEREUM]).unwrap();
    let keychain = eth_only.keychain_from_data(&sealed, PASSWORD).unwrap();
    assert_eq!(keychain.networks(), vec![Network::ETHEREUM]);

    let path = bitcoin::KeyPath::bip44(false, 0, 0, 0).unwrap();
    assert!(matches!(
        keychain.pub_key(&Network::BITCOIN, &path),
        Err(Error::KeyDoesNotExist(Network::BITCOIN))
    ));
}

#[test]
fn test_keys_data_export() {
    let manager = KeychainManager::new().unwrap();
    let (_, sealed) = manager
        .keychain_from_mnemonic(MNEMONIC, PASSWORD, None)
        .unwrap();

    let keys = manager.keys_data(&sealed, PASSWORD).unwrap();
    assert_eq!(keys.len(), 3);
    for (network, data) in &keys {
        assert!(Network::ALL.contains(network));
        assert!(!data.is_empty());
    }
}

#[test]
fn test_invalid_seed_size() {
    let manager = KeychainManager::new().unwrap();
    assert!(matches!(
        manager.keychain_from_seed(&[0u8; 32], PASSWORD),
        Err(Error::InvalidSeedSize(32, 64))
    ));
}
