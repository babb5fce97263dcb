//! Message ordering, history and publish-after-leave.

mod helpers;

use std::sync::Arc;

use campus_core::config::RealtimeConfig;
use campus_core::error::ErrorKind;
use campus_core::types::{RoomId, ZoneId};
use campus_realtime::message::types::RoomEvent;

use helpers::{TestEngine, drain, user};

fn message_ids(events: &[RoomEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|event| match event {
            RoomEvent::Message { message, .. } => Some(message.id),
            RoomEvent::MembershipChanged { .. } => None,
        })
        .collect()
}

#[tokio::test]
async fn test_ids_are_gapless_and_delivery_ordered() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let a = gw.connect(user("a")).unwrap();
    let b = gw.connect(user("b")).unwrap();
    let zone = ZoneId::from("campanile");

    let a_join = gw.join(&a, &zone).await.unwrap();
    let mut b_join = gw.join(&b, &zone).await.unwrap();

    for i in 0..20 {
        let (client, session) = if i % 2 == 0 {
            (&a, a_join.handle.session_id)
        } else {
            (&b, b_join.handle.session_id)
        };
        gw.say(client, &session, &format!("msg {i}")).await.unwrap();
    }

    let received = message_ids(&drain(&mut b_join.events));
    assert_eq!(received, (1..=20).collect::<Vec<u64>>());

    let history = gw.get_messages(&RoomId::from("campanile"), Some(100)).await.unwrap();
    let ids: Vec<u64> = history.iter().map(|m| m.id).collect();
    assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
    assert_eq!(history[3].body, "msg 3");
    assert_eq!(history[3].sender_user_id.as_str(), "b");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_publishers_share_one_order() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let zone = ZoneId::from("campanile");

    let mut publishers = Vec::new();
    let mut listeners = Vec::new();
    for name in ["a", "b", "c", "d"] {
        let client = gw.connect(user(name)).unwrap();
        let joined = gw.join(&client, &zone).await.unwrap();
        publishers.push((client, joined.handle.session_id));
        listeners.push(joined.events);
    }

    let mut tasks = Vec::new();
    for (client, session) in publishers {
        let gw = Arc::clone(&gw);
        tasks.push(tokio::spawn(async move {
            for i in 0..25 {
                gw.say(&client, &session, &format!("{i}")).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for mut events in listeners {
        let ids = message_ids(&drain(&mut events));
        assert_eq!(ids, (1..=100).collect::<Vec<u64>>());
    }
}

#[tokio::test]
async fn test_publish_after_leave_is_rejected_and_not_logged() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let a = gw.connect(user("a")).unwrap();
    let b = gw.connect(user("b")).unwrap();
    let zone = ZoneId::from("campanile");

    let a_join = gw.join(&a, &zone).await.unwrap();
    let mut b_join = gw.join(&b, &zone).await.unwrap();
    gw.say(&a, &a_join.handle.session_id, "before").await.unwrap();
    gw.leave(&a, &a_join.handle.session_id).await.unwrap();
    drain(&mut b_join.events);

    let err = gw.say(&a, &a_join.handle.session_id, "after").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotSubscribed);

    // Through the registry directly as well.
    let err = t
        .engine
        .rooms
        .publish(&a_join.handle.session_id, "after")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotSubscribed);

    let history = gw.get_messages(&RoomId::from("campanile"), None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].body, "before");
    assert!(drain(&mut b_join.events).is_empty());

    // The next accepted message continues the sequence.
    let next = gw.say(&b, &b_join.handle.session_id, "next").await.unwrap();
    assert_eq!(next.id, 2);
}

#[tokio::test]
async fn test_history_limits_and_log_capacity() {
    let config = RealtimeConfig {
        message_log_capacity: 10,
        default_history_limit: 4,
        ..RealtimeConfig::default()
    };
    let t = TestEngine::with_config(config);
    let gw = t.engine.gateway.clone();
    let room = RoomId::from("campanile");
    let a = gw.connect(user("a")).unwrap();
    let joined = gw.join(&a, &ZoneId::from("campanile")).await.unwrap();

    for i in 1..=15 {
        gw.say(&a, &joined.handle.session_id, &format!("m{i}")).await.unwrap();
    }

    let ids = |messages: Vec<campus_entity::room::ChatMessage>| {
        messages.into_iter().map(|m| m.id).collect::<Vec<_>>()
    };

    // Default limit.
    assert_eq!(ids(gw.get_messages(&room, None).await.unwrap()), vec![12, 13, 14, 15]);
    // Explicit limit, oldest first.
    assert_eq!(ids(gw.get_messages(&room, Some(2)).await.unwrap()), vec![14, 15]);
    // Clamped to what the log retains.
    assert_eq!(
        ids(gw.get_messages(&room, Some(500)).await.unwrap()),
        (6..=15).collect::<Vec<u64>>()
    );
    assert!(gw.get_messages(&room, Some(0)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_history_of_unknown_and_quiet_rooms() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();

    let err = gw.get_messages(&RoomId::from("atlantis"), None).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidZone);
    let err = gw.get_roster(&RoomId::from("atlantis")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidZone);

    // Known rooms without a live channel, the inactive one included.
    assert!(gw.get_messages(&RoomId::from("doe-study-a"), None).await.unwrap().is_empty());
    assert!(gw.get_roster(&RoomId::from("sather-gate")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_message_body_validation() {
    let t = TestEngine::new();
    let gw = t.engine.gateway.clone();
    let a = gw.connect(user("a")).unwrap();
    let joined = gw.join(&a, &ZoneId::from("campanile")).await.unwrap();
    let session = joined.handle.session_id;

    let err = gw.say(&a, &session, "   ").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    let err = gw.say(&a, &session, &"x".repeat(1001)).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let message = gw.say(&a, &session, "  trimmed  ").await.unwrap();
    assert_eq!(message.id, 1);
    assert_eq!(message.body, "trimmed");
}
