#![allow(dead_code)]

use axum_test::TestServer;
use axum::http::HeaderValue;
use chrono::Utc;
use shawty::domain::entities::UrlRecord;
use shawty::domain::repositories::UrlStore;
use shawty::infrastructure::persistence::MemoryUrlStore;
use shawty::prelude::ShortenerService;
use shawty::routes::app_router;
use shawty::state::AppState;
use shawty::utils::short_id::derive_short_id;
use std::sync::Arc;

pub const TEST_HOST: &str = "localhost:8080";
pub const TEST_ORIGIN: &str = "http://localhost:3000";

pub fn create_test_state(behind_proxy: bool) -> (AppState, Arc<MemoryUrlStore>) {
    let store = Arc::new(MemoryUrlStore::new());
    let shortener = Arc::new(ShortenerService::new(store.clone()));

    let state = AppState::new(
        shortener,
        HeaderValue::from_static(TEST_ORIGIN),
        behind_proxy,
    );

    (state, store)
}

/// Full application router over an empty in-memory store.
pub fn create_test_server() -> (TestServer, Arc<MemoryUrlStore>) {
    let (state, store) = create_test_state(false);
    (TestServer::new(app_router(state)).unwrap(), store)
}

pub fn create_proxied_test_server() -> (TestServer, Arc<MemoryUrlStore>) {
    let (state, store) = create_test_state(true);
    (TestServer::new(app_router(state)).unwrap(), store)
}

/// Stores `url` under its derived id, as a previous submission would have.
pub async fn seed_url(store: &MemoryUrlStore, url: &str) -> UrlRecord {
    let record = UrlRecord::new(derive_short_id(url), url.to_string(), Utc::now());
    store.save(&record).await.unwrap();
    record
}
