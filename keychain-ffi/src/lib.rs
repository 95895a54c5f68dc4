//! C ABI for the multi-network keychain
//!
//! Foreign callers link against a small, stable surface: the `Network`
//! constants, a fallible constructor returning a tagged result, and an
//! explicit teardown operation. The manager handle is opaque; no internal
//! state crosses the boundary, and construction failures surface as a bare
//! error tag (causes are logged on this side only).

mod manager;
mod network;
mod result;

pub use manager::*;
pub use network::*;
pub use result::*;
