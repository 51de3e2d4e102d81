//! Runtime configuration re-exports.
//!
//! The validated config types live in `santa-core::config`; this module
//! re-exports them for convenience.

pub use santa_core::config::{AdminConfig, RegistryConfig, ServerConfig, SharedConfig};
