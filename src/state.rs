use std::sync::Arc;

use crate::auth::TokenSettings;
use crate::config::Config;
use crate::store::Store;

/// Shared, read-only application state handed to every handler via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: TokenSettings,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, tokens: TokenSettings, bcrypt_cost: u32) -> Self {
        Self {
            store,
            tokens,
            bcrypt_cost,
        }
    }

    pub fn from_config(store: Arc<dyn Store>, config: &Config) -> Self {
        Self::new(
            store,
            TokenSettings {
                secret: config.jwt_secret.clone(),
                expiration_hours: config.jwt_expiration_hours,
            },
            config.bcrypt_cost,
        )
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}
