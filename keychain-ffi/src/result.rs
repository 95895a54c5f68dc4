//! Tagged result types crossing the ABI
//!
//! Layout contract: the discriminant comes first with Err before Ok, and the
//! Ok variant wraps its payload by value in a single-field body. The Err
//! variant carries no payload; diagnostic detail never crosses the boundary.

use crate::manager::KeychainManager;

/// Outcome of [`crate::keychain_manager_new`].
#[repr(C)]
pub enum CResultKeychainManager {
    Err,
    Ok(KeychainManager),
}

impl CResultKeychainManager {
    pub fn is_ok(&self) -> bool {
        matches!(self, CResultKeychainManager::Ok(_))
    }
}
