//! Application state shared across all request handlers.

use crate::config::runtime::SharedConfig;
use santa_core::exchange::GiftExchange;
use santa_core::store::PgStore;
use sqlx::PgPool;
use std::sync::Arc;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// The gift exchange engine over the Postgres store.
    pub exchange: Arc<GiftExchange<PgStore>>,
    /// Shared configuration with separate locks per section.
    pub config: SharedConfig,
}

impl AppState {
    /// Create a new AppState with the given database pool and configuration.
    pub fn new(db: PgPool, config: SharedConfig) -> Self {
        Self {
            exchange: Arc::new(GiftExchange::new(PgStore::new(db))),
            config,
        }
    }
}
