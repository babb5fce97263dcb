//! Presence heartbeats, expiry and the diff stream.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use campus_core::error::ErrorKind;
use campus_core::types::{UserId, ZoneId};
use campus_entity::presence::{Position, PresenceStatus};

use helpers::{TestEngine, user};

#[tokio::test]
async fn test_heartbeat_keeps_presence_alive() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let a = gw.connect(user("a")).unwrap();

    t.advance_secs(10);
    gw.heartbeat(&a).unwrap();
    t.advance_secs(10);
    assert_eq!(gw.presence_snapshot(None).unwrap().len(), 1);
    assert_eq!(t.engine.reconciler.sweep().await.presence_expired, 0);

    // Exactly at the timeout the record is no longer alive.
    t.advance_secs(5);
    assert!(gw.presence_snapshot(None).unwrap().is_empty());
    assert!(t.engine.presence.get(&UserId::from("a")).is_none());
    assert_eq!(t.engine.metrics.snapshot().presence_expired, 1);
}

#[tokio::test]
async fn test_map_activity_keeps_room_seat() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let a = gw.connect(user("a")).unwrap();
    let joined = gw.join(&a, &ZoneId::from("campanile")).await.unwrap();

    t.advance_secs(10);
    gw.move_user(&a, &UserId::from("a"), Position::new(1.0, 2.0))
        .unwrap();
    t.advance_secs(10);

    let report = t.engine.reconciler.sweep().await;
    assert_eq!(report.sessions_expired, 0);
    assert_eq!(
        gw.get_roster(&joined.handle.room_id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_lapsed_record_starts_over() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let a = gw.connect(user("a")).unwrap();

    gw.set_status(&a, PresenceStatus::Studying, Some("midterms".into()))
        .unwrap();
    gw.enter_zone(&a, Some(ZoneId::from("campanile"))).unwrap();

    // Lapses without a sweep, then heartbeats again.
    t.advance_secs(30);
    let record = gw.heartbeat(&a).unwrap();
    assert_eq!(record.status, PresenceStatus::Available);
    assert_eq!(record.status_message, None);
    assert_eq!(record.zone_id, None);
}

#[tokio::test]
async fn test_snapshot_filters_by_zone() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let a = gw.connect(user("a")).unwrap();
    let b = gw.connect(user("b")).unwrap();
    let c = gw.connect(user("c")).unwrap();

    gw.enter_zone(&c, Some(ZoneId::from("campanile"))).unwrap();
    gw.enter_zone(&a, Some(ZoneId::from("campanile"))).unwrap();
    gw.enter_zone(&b, Some(ZoneId::from("doe-library"))).unwrap();

    let ids: Vec<String> = gw
        .presence_snapshot(Some(&ZoneId::from("campanile")))
        .unwrap()
        .into_iter()
        .map(|r| r.user_id.to_string())
        .collect();
    assert_eq!(ids, vec!["a", "c"]);

    // Known but inactive zones are a valid, empty filter.
    assert!(gw
        .presence_snapshot(Some(&ZoneId::from("sather-gate")))
        .unwrap()
        .is_empty());
    let err = gw
        .presence_snapshot(Some(&ZoneId::from("atlantis")))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidZone);

    // Leaving the zone on the map.
    gw.enter_zone(&a, None).unwrap();
    assert_eq!(
        gw.presence_snapshot(Some(&ZoneId::from("campanile")))
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_rejected_position_leaves_record_unchanged() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let a = gw.connect(user("a")).unwrap();

    gw.move_user(&a, &UserId::from("a"), Position::new(10.0, 20.0))
        .unwrap();
    let err = gw
        .move_user(&a, &UserId::from("a"), Position::new(f64::NAN, 0.0))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let record = t.engine.presence.get(&UserId::from("a")).unwrap();
    assert_eq!(record.position, Some(Position::new(10.0, 20.0)));
}

#[tokio::test]
async fn test_diff_stream_reports_online_and_offline() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let mut diffs = gw.presence_events();

    let a = gw.connect(user("a")).unwrap();
    let online = diffs.recv().await.unwrap();
    assert_eq!(online.user_id.as_str(), "a");
    assert!(online.online);

    gw.set_status(&a, PresenceStatus::Busy, None).unwrap();
    let busy = diffs.recv().await.unwrap();
    assert_eq!(busy.status, PresenceStatus::Busy);

    t.advance_secs(15);
    t.engine.reconciler.sweep().await;
    let offline = tokio::time::timeout(Duration::from_secs(1), diffs.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(offline.user_id.as_str(), "a");
    assert!(!offline.online);
}

#[tokio::test]
async fn test_connection_limit_per_user() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();

    let tabs: Vec<_> = (0..5).map(|_| gw.connect(user("a")).unwrap()).collect();
    let err = gw.connect(user("a")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    assert_eq!(t.engine.stats().connections, 5);
    assert_eq!(t.engine.stats().connected_users, 1);

    gw.disconnect(&tabs[0]).await;
    assert!(gw.connect(user("a")).is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reconnect_racing_disconnect_keeps_presence() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let ada = UserId::from("ada");

    for _ in 0..200 {
        let old = gw.connect(user("ada")).unwrap();
        let closing = {
            let gw = Arc::clone(&gw);
            tokio::spawn(async move { gw.disconnect(&old).await })
        };
        let opening = {
            let gw = Arc::clone(&gw);
            tokio::spawn(async move { gw.connect(user("ada")) })
        };
        closing.await.unwrap();
        let new = opening.await.unwrap().unwrap();

        assert!(t.engine.presence.get(&ada).is_some());
        gw.disconnect(&new).await;
        assert!(t.engine.presence.get(&ada).is_none());
    }
}
