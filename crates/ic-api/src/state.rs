use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use ic_services::Services;
use std::sync::Arc;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<Services>,
    key: Key,
    pub cookie_secure: bool,
}

impl AppState {
    /// `secret` must be at least 32 bytes; the signing key is derived from it.
    pub fn new(services: Arc<Services>, secret: &[u8], cookie_secure: bool) -> Self {
        Self {
            services,
            key: Key::derive_from(secret),
            cookie_secure,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.key.clone()
    }
}
