use std::sync::Arc;

use crate::auth::{AuthError, PasswordVerifier, TokenService};
use crate::config::AppConfig;
use crate::database::Store;

/// Shared application state, built once at startup and handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub tokens: Arc<TokenService>,
    pub passwords: Arc<PasswordVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Store) -> Result<Self, AuthError> {
        let tokens = TokenService::from_config(&config.security)?;
        let passwords = PasswordVerifier::from_config(&config.security)?;
        Ok(Self {
            config: Arc::new(config),
            store,
            tokens: Arc::new(tokens),
            passwords: Arc::new(passwords),
        })
    }
}
