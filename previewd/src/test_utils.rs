//! Test utilities for integration testing (available with `test-utils` feature).

use crate::config::Config;
use crate::previews::{Enricher, MockEnricher};
use crate::storage::{InMemoryObjectStore, ObjectStore};
use axum_test::TestServer;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use std::sync::Arc;

/// Start of a baseline JPEG: SOI, a JFIF APP0 segment, then EOI.
pub const SAMPLE_JPEG: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x48, 0x00, 0x48, 0x00, 0x00, 0xFF,
    0xD9,
];

pub fn sample_image_base64() -> String {
    STANDARD.encode(SAMPLE_JPEG)
}

pub fn sample_image_data_uri() -> String {
    format!("data:image/jpeg;base64,{}", sample_image_base64())
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.host = "127.0.0.1".to_string();
    config.port = 0;
    config.storage.access_key_id = Some("test-key-id".to_string());
    config.storage.secret_access_key = Some("test-secret".to_string());
    config
}

/// Test server over an in-memory store with the mock enricher.
pub fn create_test_app() -> (TestServer, Arc<InMemoryObjectStore>) {
    let store = Arc::new(InMemoryObjectStore::new());
    let server = create_test_app_with(create_test_config(), store.clone(), Arc::new(MockEnricher));
    (server, store)
}

pub fn create_test_app_with(config: Config, store: Arc<dyn ObjectStore>, enricher: Arc<dyn Enricher>) -> TestServer {
    crate::Application::with_components(config, store, enricher)
        .expect("Failed to create application")
        .into_test_server()
}
