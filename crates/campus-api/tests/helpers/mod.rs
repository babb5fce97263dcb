//! Shared test helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use campus_core::config::{AppConfig, RoomConfig, ZoneConfig};
use campus_core::traits::ManualClock;
use campus_entity::user::{UserHandle, UserRole};
use campus_realtime::{RealtimeEngine, ZoneCatalog};

use campus_api::{AppState, build_app};

/// Test application context.
pub struct TestApp {
    /// Router under test
    pub router: Router,
    /// Engine behind the router
    pub engine: Arc<RealtimeEngine>,
    /// Clock driving the engine
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// App over a two-zone catalog.
    pub fn new() -> Self {
        let config = AppConfig {
            zones: test_zones(),
            ..AppConfig::default()
        };
        let clock = Arc::new(ManualClock::starting_now());
        let catalog = ZoneCatalog::from_configs(config.zones.clone()).expect("valid test catalog");
        let engine = Arc::new(RealtimeEngine::with_clock(
            config.realtime.clone(),
            catalog,
            clock.clone(),
        ));
        let cors = config.server.cors.clone();
        let router = build_app(AppState::new(config, engine.clone()), &cors);

        Self {
            router,
            engine,
            clock,
        }
    }

    /// Make a GET request to the test app
    pub async fn get(&self, path: &str) -> TestResponse {
        let req = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// `doe-library` (capacity 2, with a study room) and `campanile`.
pub fn test_zones() -> Vec<ZoneConfig> {
    vec![
        ZoneConfig {
            id: "doe-library".into(),
            display_name: "Doe Library".into(),
            description: None,
            capacity: 2,
            zone_type: "academic".into(),
            x: 350.0,
            y: 250.0,
            is_active: true,
            rooms: vec![RoomConfig {
                id: "doe-study-a".into(),
                name: "Study Room A".into(),
                capacity: 4,
            }],
        },
        ZoneConfig {
            id: "campanile".into(),
            display_name: "Campanile".into(),
            description: None,
            capacity: 50,
            zone_type: "landmark".into(),
            x: 400.0,
            y: 300.0,
            is_active: true,
            rooms: Vec::new(),
        },
    ]
}

/// A student handle whose display name equals the id.
pub fn user(id: &str) -> UserHandle {
    UserHandle::new(id, id, None, UserRole::Student).expect("valid user")
}
