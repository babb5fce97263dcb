//! Capacity under concurrent joins and occupancy reconciliation.

mod helpers;

use std::sync::Arc;

use campus_core::error::ErrorKind;
use campus_core::types::{RoomId, ZoneId};

use helpers::{TestEngine, user};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_never_exceed_capacity() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let gw = Arc::clone(&gw);
        let client = gw.connect(user(&format!("user-{i:02}"))).unwrap();
        tasks.push(tokio::spawn(async move {
            gw.join(&client, &ZoneId::from("doe-library")).await
        }));
    }

    let mut admitted = Vec::new();
    let mut full = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(joined) => admitted.push(joined),
            Err(e) => {
                assert_eq!(e.kind, ErrorKind::RoomFull);
                full += 1;
            }
        }
    }

    assert_eq!(admitted.len(), 2);
    assert_eq!(full, 14);

    let room = RoomId::from("doe-library");
    assert_eq!(t.engine.rooms.occupancy(&room).await.unwrap(), 2);
    assert_eq!(t.engine.gateway.get_roster(&room).await.unwrap().len(), 2);
    assert_eq!(t.engine.metrics.snapshot().sessions_rejected, 14);

    // Nothing to correct.
    let report = t.engine.reconciler.sweep().await;
    assert_eq!(report.rooms_corrected, 0);
    assert_eq!(report.sessions_expired, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_join_and_leave_keep_occupancy_consistent() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let zone = ZoneId::from("campanile");

    let mut tasks = Vec::new();
    for i in 0..20 {
        let gw = Arc::clone(&gw);
        let client = gw.connect(user(&format!("user-{i:02}"))).unwrap();
        let zone = zone.clone();
        tasks.push(tokio::spawn(async move {
            let joined = gw.join(&client, &zone).await.unwrap();
            if i % 2 == 0 {
                gw.leave(&client, &joined.handle.session_id).await.unwrap();
            }
            joined
        }));
    }
    let mut kept = Vec::new();
    for task in tasks {
        kept.push(task.await.unwrap());
    }

    let room = RoomId::from("campanile");
    let occupancy = t.engine.rooms.occupancy(&room).await.unwrap();
    let roster = t.engine.gateway.get_roster(&room).await.unwrap();
    assert_eq!(occupancy, 10);
    assert_eq!(roster.len(), 10);
    assert!(t.engine.reconciler.sweep().await.is_noop());
    drop(kept);
}

#[tokio::test]
async fn test_same_user_sessions_count_toward_capacity() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let zone = ZoneId::from("doe-library");

    let tab1 = gw.connect(user("a")).unwrap();
    let tab2 = gw.connect(user("a")).unwrap();
    let other = gw.connect(user("b")).unwrap();

    let _first = gw.join(&tab1, &zone).await.unwrap();
    let _second = gw.join(&tab2, &zone).await.unwrap();
    let err = gw.join(&other, &zone).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RoomFull);
}

#[tokio::test]
async fn test_full_room_admits_after_a_leave() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let zone = ZoneId::from("doe-library");

    let a = gw.connect(user("a")).unwrap();
    let b = gw.connect(user("b")).unwrap();
    let c = gw.connect(user("c")).unwrap();

    let a_join = gw.join(&a, &zone).await.unwrap();
    let _b_join = gw.join(&b, &zone).await.unwrap();
    assert!(gw.join(&c, &zone).await.is_err());

    gw.leave(&a, &a_join.handle.session_id).await.unwrap();
    let c_join = gw.join(&c, &zone).await.unwrap();
    assert_eq!(c_join.handle.room_id.as_str(), "doe-library");
    assert_eq!(
        t.engine.rooms.occupancy(&RoomId::from("doe-library")).await.unwrap(),
        2
    );
}

#[tokio::test]
async fn test_dropped_receiver_frees_its_seat_on_sweep() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let zone = ZoneId::from("doe-library");

    let a = gw.connect(user("a")).unwrap();
    let b = gw.connect(user("b")).unwrap();
    let a_join = gw.join(&a, &zone).await.unwrap();
    let b_join = gw.join(&b, &zone).await.unwrap();

    // B's consumer goes away; the next fan-out marks the session dead.
    drop(b_join.events);
    gw.say(&a, &a_join.handle.session_id, "anyone?").await.unwrap();
    let err = gw.say(&b, &b_join.handle.session_id, "me").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotSubscribed);

    let report = t.engine.reconciler.sweep().await;
    assert_eq!(report.sessions_expired, 1);
    assert_eq!(
        t.engine.rooms.occupancy(&RoomId::from("doe-library")).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_lapsed_session_leaves_roster_without_sweep() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let room = RoomId::from("campanile");

    let a = gw.connect(user("a")).unwrap();
    let _joined = gw.join(&a, &ZoneId::from("campanile")).await.unwrap();
    assert_eq!(gw.get_roster(&room).await.unwrap().len(), 1);

    t.advance_secs(20);
    assert!(gw.presence_snapshot(None).unwrap().is_empty());
    assert!(gw.get_roster(&room).await.unwrap().is_empty());
    assert_eq!(t.engine.rooms.occupancy(&room).await.unwrap(), 0);
    assert_eq!(t.engine.metrics.snapshot().sessions_expired, 1);

    // Already gone by the time the sweep runs.
    assert_eq!(t.engine.reconciler.sweep().await.sessions_expired, 0);
}

#[tokio::test]
async fn test_lapsed_seats_free_capacity_before_sweep() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let zone = ZoneId::from("doe-library");

    let a = gw.connect(user("a")).unwrap();
    let b = gw.connect(user("b")).unwrap();
    let _a_join = gw.join(&a, &zone).await.unwrap();
    let _b_join = gw.join(&b, &zone).await.unwrap();

    t.advance_secs(20);
    let c = gw.connect(user("c")).unwrap();
    let c_join = gw.join(&c, &zone).await.unwrap();

    let roster = gw.get_roster(&c_join.handle.room_id).await.unwrap();
    let ids: Vec<_> = roster.iter().map(|e| e.user_id.to_string()).collect();
    assert_eq!(ids, vec!["c"]);
}
