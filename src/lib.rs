//! Workspace placeholder crate.
//!
//! This crate exists to expose a single dependency for hosts that want the
//! whole mirror stack. Enabling `desktop-shims` (the default) pulls in the
//! runtime with desktop bridge defaults, the sync engine and the SmugMug
//! provider without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_runtime;
#[cfg(feature = "desktop-shims")]
pub use core_sync;
#[cfg(feature = "desktop-shims")]
pub use provider_smugmug;
