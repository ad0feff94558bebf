use std::sync::Arc;

use examhall_config::{CorsConfig, JwtConfig};
use examhall_db::AccountStore;

/// Shared request state. The store is constructed once at startup and
/// injected here; nothing reaches for a global pool.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

impl AppState {
    pub fn new(
        store: impl AccountStore + 'static,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            jwt_config,
            cors_config,
        }
    }
}
