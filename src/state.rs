use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::CatalogStore;

/// Request context shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>, tokens: TokenService, config: AppConfig) -> Self {
        Self { store, tokens: Arc::new(tokens), config: Arc::new(config) }
    }
}
