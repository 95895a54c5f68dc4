//! Opaque manager handle and its lifecycle

use std::ffi::c_void;
use std::panic::{self, AssertUnwindSafe};

use keychain::KeychainManager as RKeychainManager;
use tracing::warn;

use crate::network::Network;
use crate::result::CResultKeychainManager;

/// Opaque handle to a [`RKeychainManager`] owned by the library.
///
/// Created by [`keychain_manager_new`], released exactly once by
/// [`keychain_manager_free`]. The handle is not thread-safe; callers must
/// serialize access themselves.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct KeychainManager(*mut c_void);

impl KeychainManager {
    fn new(manager: RKeychainManager) -> Self {
        Self(Box::into_raw(Box::new(manager)) as *mut c_void)
    }

    unsafe fn rust_ref(&self) -> Option<&RKeychainManager> {
        (self.0 as *mut RKeychainManager).as_ref()
    }

    unsafe fn free(&mut self) {
        if self.0.is_null() {
            return;
        }
        drop(Box::from_raw(self.0 as *mut RKeychainManager));
        self.0 = std::ptr::null_mut();
    }
}

/// Construct a new keychain manager.
///
/// Returns the Ok variant owning a fresh handle, or the bare Err tag if
/// initialization is not possible. Each successful call yields an
/// independently owned instance. Panics are contained at the boundary and
/// reported as Err.
#[no_mangle]
pub extern "C" fn keychain_manager_new() -> CResultKeychainManager {
    match panic::catch_unwind(RKeychainManager::new) {
        Ok(Ok(manager)) => CResultKeychainManager::Ok(KeychainManager::new(manager)),
        Ok(Err(err)) => {
            warn!(error = %err, "keychain manager construction failed");
            CResultKeychainManager::Err
        }
        Err(_) => {
            warn!("keychain manager construction panicked");
            CResultKeychainManager::Err
        }
    }
}

/// Release a manager handle.
///
/// Safe to call more than once on the same handle and on a null handle; the
/// first call releases, later calls are no-ops.
#[no_mangle]
pub unsafe extern "C" fn keychain_manager_free(manager: &mut KeychainManager) {
    manager.free();
}

/// Whether the manager can derive keys for `network`.
///
/// Unknown network codes are a well-defined failure: the answer is false.
#[no_mangle]
pub unsafe extern "C" fn keychain_manager_has_network(
    manager: &KeychainManager,
    network: Network,
) -> bool {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        manager
            .rust_ref()
            .map(|manager| manager.has_network(&network.into()))
            .unwrap_or(false)
    }));
    result.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::{NETWORK_BITCOIN, NETWORK_CARDANO, NETWORK_ETHEREUM};

    fn construct() -> KeychainManager {
        match keychain_manager_new() {
            CResultKeychainManager::Ok(manager) => manager,
            CResultKeychainManager::Err => panic!("construction failed"),
        }
    }

    #[test]
    fn test_new_returns_ok() {
        let mut manager = construct();
        assert!(!manager.0.is_null());
        unsafe { keychain_manager_free(&mut manager) };
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = construct();
        let mut b = construct();
        assert_ne!(a.0, b.0);
        unsafe {
            keychain_manager_free(&mut a);
            keychain_manager_free(&mut b);
        }
    }

    #[test]
    fn test_free_is_idempotent() {
        let mut manager = construct();
        unsafe {
            keychain_manager_free(&mut manager);
            assert!(manager.0.is_null());
            // second free must be a no-op
            keychain_manager_free(&mut manager);
        }
    }

    #[test]
    fn test_has_network() {
        let mut manager = construct();
        unsafe {
            assert!(keychain_manager_has_network(&manager, NETWORK_BITCOIN));
            assert!(keychain_manager_has_network(&manager, NETWORK_CARDANO));
            assert!(keychain_manager_has_network(&manager, NETWORK_ETHEREUM));
            // out-of-range code: well-defined, just false
            assert!(!keychain_manager_has_network(&manager, Network(7)));
            keychain_manager_free(&mut manager);
            // released handle answers false rather than touching freed memory
            assert!(!keychain_manager_has_network(&manager, NETWORK_BITCOIN));
        }
    }
}
