//! Shared state injected into every handler.

use std::sync::Arc;

use axum::http::HeaderValue;

use crate::application::services::ShortenerService;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService>,
    /// Value sent as `Access-Control-Allow-Origin`.
    pub cors_allowed_origin: HeaderValue,
    /// When true, `X-Forwarded-Proto` decides the scheme of generated short URLs.
    pub trust_forwarded_proto: bool,
}

impl AppState {
    pub fn new(
        shortener: Arc<ShortenerService>,
        cors_allowed_origin: HeaderValue,
        trust_forwarded_proto: bool,
    ) -> Self {
        Self {
            shortener,
            cors_allowed_origin,
            trust_forwarded_proto,
        }
    }
}
