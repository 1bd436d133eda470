use std::sync::Arc;

use compass_core::config::Config;
use compass_core::store::EventStore;

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// The store is held behind the [`EventStore`] trait so integration tests
/// swap in an in-memory mock; production wires in the Postgres backend
/// (constructed once at startup, never global).
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
