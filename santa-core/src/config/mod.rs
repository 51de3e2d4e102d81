//! Configuration types for the gift exchange server.
//!
//! These types represent the validated runtime configuration used by the server
//! and can be shared across crates. The actual config loading/parsing is handled
//! by the server crate.

mod admin;
mod registry;
mod server;

pub use admin::AdminConfig;
pub use registry::{RegistryConfig, normalize_external_id};
pub use server::ServerConfig;

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared configuration state with separate locks for each section.
///
/// This allows independent access to different configuration sections
/// without blocking other readers/writers.
#[derive(Clone)]
pub struct SharedConfig {
    /// Server configuration (listen address, etc.).
    pub server: Arc<RwLock<ServerConfig>>,
    /// Admin configuration (authentication).
    pub admin: Arc<RwLock<AdminConfig>>,
    /// Eligibility roster rules.
    pub registry: Arc<RwLock<RegistryConfig>>,
}

impl SharedConfig {
    /// Create a new SharedConfig from individual configuration parts.
    pub fn new(server: ServerConfig, admin: AdminConfig, registry: RegistryConfig) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            admin: Arc::new(RwLock::new(admin)),
            registry: Arc::new(RwLock::new(registry)),
        }
    }

    /// Update all configuration sections at once.
    pub async fn update_all(
        &self,
        server: ServerConfig,
        admin: AdminConfig,
        registry: RegistryConfig,
    ) {
        // Update in sequence to avoid potential deadlocks
        *self.server.write().await = server;
        *self.admin.write().await = admin;
        *self.registry.write().await = registry;
    }
}
