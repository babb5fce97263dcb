//! Shared test helpers for realtime integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tokio::sync::mpsc;

use campus_core::config::RealtimeConfig;
use campus_core::config::zones::{RoomConfig, ZoneConfig};
use campus_core::traits::ManualClock;
use campus_entity::user::{UserHandle, UserRole};
use campus_realtime::message::types::RoomEvent;
use campus_realtime::{RealtimeEngine, ZoneCatalog};

/// Engine plus the clock that drives it.
pub struct TestEngine {
    /// The engine under test
    pub engine: RealtimeEngine,
    /// Manual clock shared with the engine
    pub clock: Arc<ManualClock>,
}

impl TestEngine {
    /// Engine over a small catalog where `doe-library` holds two sessions.
    pub fn new() -> Self {
        Self::with_config(RealtimeConfig::default())
    }

    /// Same catalog, custom settings.
    pub fn with_config(config: RealtimeConfig) -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let catalog = ZoneCatalog::from_configs(test_zones()).expect("valid test catalog");
        let engine = RealtimeEngine::with_clock(config, catalog, clock.clone());
        Self { engine, clock }
    }

    /// Moves time forward by whole seconds.
    pub fn advance_secs(&self, secs: i64) {
        self.clock.advance(chrono::Duration::seconds(secs));
    }
}

/// `doe-library` (capacity 2, with a study room of capacity 4),
/// `campanile` (capacity 50) and an inactive `sather-gate`.
pub fn test_zones() -> Vec<ZoneConfig> {
    vec![
        ZoneConfig {
            id: "doe-library".into(),
            display_name: "Doe Library".into(),
            description: Some("Main library on campus".into()),
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
        ZoneConfig {
            id: "sather-gate".into(),
            display_name: "Sather Gate".into(),
            description: None,
            capacity: 30,
            zone_type: "landmark".into(),
            x: 200.0,
            y: 400.0,
            is_active: false,
            rooms: Vec::new(),
        },
    ]
}

/// A student handle whose display name equals the id.
pub fn user(id: &str) -> UserHandle {
    UserHandle::new(id, id, None, UserRole::Student).expect("valid user")
}

/// Pulls every queued room event without waiting.
pub fn drain(rx: &mut mpsc::Receiver<RoomEvent>) -> Vec<RoomEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Roster user ids of a membership event, or `None` for other events.
pub fn roster_ids(event: &RoomEvent) -> Option<Vec<String>> {
    match event {
        RoomEvent::MembershipChanged { roster, .. } => {
            Some(roster.iter().map(|e| e.user_id.to_string()).collect())
        }
        RoomEvent::Message { .. } => None,
    }
}
