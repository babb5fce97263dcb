//! A single room: roster, cached occupancy and message log.
//!
//! A `Room` is always accessed under its registry mutex, which makes
//! check-then-insert and append-then-fan-out atomic and totally orders
//! joins, leaves and messages within the room.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use campus_core::AppError;
use campus_core::result::AppResult;
use campus_core::types::{RoomId, SessionId, ZoneId};
use campus_entity::room::{ChatMessage, RosterEntry};

use super::log::MessageLog;
use super::session::RoomSession;
use crate::catalog::RoomTarget;
use crate::message::types::RoomEvent;

/// Outcome of reconciling one room.
#[derive(Debug, Default)]
pub struct RoomReconcile {
    /// Sessions removed because they were silent or dead.
    pub expired: Vec<Arc<RoomSession>>,
    /// `(cached, actual)` when the cached occupancy had drifted.
    pub drift: Option<(u32, u32)>,
    /// Events that could not be queued.
    pub dropped: usize,
}

/// Per-room pub/sub unit.
#[derive(Debug)]
pub struct Room {
    /// Room id.
    pub id: RoomId,
    /// Owning zone.
    pub zone_id: ZoneId,
    /// Display name.
    pub name: String,
    /// Maximum concurrent sessions.
    pub capacity: u32,
    /// Members in join order.
    roster: Vec<Arc<RoomSession>>,
    /// Cached `roster.len()`.
    occupancy: u32,
    /// Recent messages.
    log: MessageLog,
    /// When the roster last became empty.
    emptied_at: Option<DateTime<Utc>>,
    /// Set by the sweep just before the room is dropped from the registry.
    closed: bool,
}

impl Room {
    /// An empty room for a catalog target.
    pub fn new(target: &RoomTarget, log_capacity: usize, now: DateTime<Utc>) -> Self {
        Self {
            id: target.room_id.clone(),
            zone_id: target.zone_id.clone(),
            name: target.name.clone(),
            capacity: target.capacity,
            roster: Vec::new(),
            occupancy: 0,
            log: MessageLog::new(log_capacity),
            emptied_at: Some(now),
            closed: false,
        }
    }

    /// Adds a session after the capacity check.
    ///
    /// Existing members are told about the change before the newcomer
    /// receives its initial roster. Returns the number of dropped events.
    pub fn admit(&mut self, session: Arc<RoomSession>) -> AppResult<usize> {
        if self.roster.len() >= self.capacity as usize {
            return Err(AppError::room_full(&self.id, self.capacity));
        }

        let newcomer = session.id;
        self.roster.push(session);
        self.occupancy += 1;
        self.emptied_at = None;

        let event = self.membership_event();
        let mut dropped = self.fan_out(&event, |s| s.id != newcomer);
        dropped += self.fan_out(&event, |s| s.id == newcomer);
        Ok(dropped)
    }

    /// Removes a session and notifies the remaining members.
    ///
    /// Returns `None` if the session was not in the roster.
    pub fn remove(
        &mut self,
        session_id: &SessionId,
        now: DateTime<Utc>,
    ) -> Option<(Arc<RoomSession>, usize)> {
        let idx = self.roster.iter().position(|s| &s.id == session_id)?;
        let session = self.roster.remove(idx);
        self.occupancy = self.occupancy.saturating_sub(1);
        if self.roster.is_empty() {
            self.emptied_at = Some(now);
        }

        let event = self.membership_event();
        let dropped = self.fan_out(&event, |_| true);
        Some((session, dropped))
    }

    /// Appends a message from a live member and fans it out to every live
    /// member, the sender included.
    pub fn publish(
        &mut self,
        session_id: &SessionId,
        body: String,
        now: DateTime<Utc>,
    ) -> AppResult<(ChatMessage, usize)> {
        let sender = self
            .roster
            .iter()
            .find(|s| &s.id == session_id && s.is_alive())
            .cloned()
            .ok_or_else(|| {
                AppError::not_subscribed(format!(
                    "Session {session_id} is not subscribed to room '{}'",
                    self.id
                ))
            })?;

        let room_id = self.id.clone();
        let message = self
            .log
            .append(|id| ChatMessage {
                id,
                room_id,
                sender_user_id: sender.user_id.clone(),
                sender: sender.display.clone(),
                body,
                server_timestamp: now,
            })
            .clone();

        let event = RoomEvent::Message {
            room_id: self.id.clone(),
            message: message.clone(),
        };
        let dropped = self.fan_out(&event, |_| true);
        Ok((message, dropped))
    }

    /// Members in join order.
    pub fn roster_view(&self) -> Vec<RosterEntry> {
        self.roster.iter().map(|s| s.roster_entry()).collect()
    }

    /// The newest `limit` messages, oldest first.
    pub fn recent_messages(&self, limit: usize) -> Vec<ChatMessage> {
        self.log.recent(limit)
    }

    /// Cached occupancy.
    pub fn occupancy(&self) -> u32 {
        self.occupancy
    }

    /// Corrects drift, then expires dead and silent sessions.
    ///
    /// Afterwards `occupancy == roster.len()`. Remaining members receive one
    /// membership event if anything was expired.
    pub fn reconcile(&mut self, now: DateTime<Utc>, timeout: Duration) -> RoomReconcile {
        let mut report = RoomReconcile::default();

        let actual = self.roster.len() as u32;
        if self.occupancy != actual {
            report.drift = Some((self.occupancy, actual));
            self.occupancy = actual;
        }

        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.roster)
            .into_iter()
            .partition(|s| s.is_expired(now, timeout));
        self.roster = kept;
        self.occupancy = self.roster.len() as u32;

        if !expired.is_empty() {
            if self.roster.is_empty() {
                self.emptied_at = Some(now);
            }
            let event = self.membership_event();
            report.dropped = self.fan_out(&event, |_| true);
        }
        report.expired = expired;
        report
    }

    /// Empty for at least `grace`.
    pub fn is_idle(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        self.roster.is_empty()
            && self
                .emptied_at
                .is_some_and(|at| now.signed_duration_since(at) >= grace)
    }

    /// Marks the room as destroyed.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether the room was destroyed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[cfg(test)]
    pub(crate) fn force_occupancy(&mut self, occupancy: u32) {
        self.occupancy = occupancy;
    }

    fn membership_event(&self) -> RoomEvent {
        RoomEvent::MembershipChanged {
            room_id: self.id.clone(),
            occupancy: self.occupancy,
            roster: self.roster_view(),
        }
    }

    fn fan_out(&self, event: &RoomEvent, include: impl Fn(&Arc<RoomSession>) -> bool) -> usize {
        self.roster
            .iter()
            .filter(|&s| s.is_alive() && include(s))
            .filter(|s| !s.deliver(event.clone()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::error::ErrorKind;
    use campus_core::types::{ConnectionId, UserId};
    use campus_entity::user::{DisplayAttrs, UserRole};
    use tokio::sync::mpsc;

    fn target(capacity: u32) -> RoomTarget {
        RoomTarget {
            room_id: RoomId::from("doe-library"),
            zone_id: ZoneId::from("doe-library"),
            name: "Doe Library".into(),
            capacity,
        }
    }

    fn member(name: &str, now: DateTime<Utc>) -> (Arc<RoomSession>, mpsc::Receiver<RoomEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let session = RoomSession::new(
            UserId::from(name),
            ConnectionId::new(),
            DisplayAttrs {
                display_name: name.to_string(),
                avatar_url: None,
                role: UserRole::Student,
            },
            RoomId::from("doe-library"),
            tx,
            now,
        );
        (Arc::new(session), rx)
    }

    #[test]
    fn test_capacity_checked_before_insert() {
        let now = Utc::now();
        let mut room = Room::new(&target(1), 10, now);
        let (a, _ra) = member("a", now);
        let (b, _rb) = member("b", now);

        room.admit(a).unwrap();
        let err = room.admit(b).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RoomFull);
        assert_eq!(room.occupancy(), 1);
        assert_eq!(room.roster_view().len(), 1);
    }

    #[test]
    fn test_existing_members_hear_join_first() {
        let now = Utc::now();
        let mut room = Room::new(&target(5), 10, now);
        let (a, mut ra) = member("a", now);
        let (b, mut rb) = member("b", now);

        room.admit(a).unwrap();
        room.admit(b).unwrap();

        // a: its own join, then b's join.
        assert!(matches!(ra.try_recv(), Ok(RoomEvent::MembershipChanged { occupancy: 1, .. })));
        assert!(matches!(ra.try_recv(), Ok(RoomEvent::MembershipChanged { occupancy: 2, .. })));
        // b: its initial roster with both members.
        match rb.try_recv() {
            Ok(RoomEvent::MembershipChanged { roster, .. }) => {
                let names: Vec<_> = roster.iter().map(|e| e.user_id.to_string()).collect();
                assert_eq!(names, vec!["a", "b"]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_publish_requires_membership() {
        let now = Utc::now();
        let mut room = Room::new(&target(5), 10, now);
        let (a, _ra) = member("a", now);
        let a_id = a.id;
        room.admit(a).unwrap();

        let (msg, _) = room.publish(&a_id, "hi".into(), now).unwrap();
        assert_eq!(msg.id, 1);

        room.remove(&a_id, now).unwrap();
        let err = room.publish(&a_id, "again".into(), now).unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotSubscribed);
        assert_eq!(room.recent_messages(10).len(), 1);
    }

    #[test]
    fn test_reconcile_corrects_drift() {
        let now = Utc::now();
        let mut room = Room::new(&target(5), 10, now);
        let (a, _ra) = member("a", now);
        room.admit(a).unwrap();

        room.force_occupancy(4);
        let report = room.reconcile(now, Duration::seconds(15));
        assert_eq!(report.drift, Some((4, 1)));
        assert_eq!(room.occupancy(), 1);
    }

    #[test]
    fn test_reconcile_expires_silent_sessions() {
        let now = Utc::now();
        let mut room = Room::new(&target(5), 10, now);
        let (a, _ra) = member("a", now);
        let (b, mut rb) = member("b", now);
        room.admit(a).unwrap();
        room.admit(b.clone()).unwrap();
        while rb.try_recv().is_ok() {}

        let later = now + Duration::seconds(20);
        b.touch(later);
        let report = room.reconcile(later, Duration::seconds(15));

        assert_eq!(report.expired.len(), 1);
        assert_eq!(report.expired[0].user_id.as_str(), "a");
        assert_eq!(room.occupancy(), 1);
        assert!(matches!(rb.try_recv(), Ok(RoomEvent::MembershipChanged { occupancy: 1, .. })));
    }

    #[test]
    fn test_idle_after_grace() {
        let now = Utc::now();
        let mut room = Room::new(&target(5), 10, now);
        let (a, _ra) = member("a", now);
        let a_id = a.id;
        room.admit(a).unwrap();
        assert!(!room.is_idle(now + Duration::hours(1), Duration::seconds(60)));

        room.remove(&a_id, now).unwrap();
        assert!(!room.is_idle(now + Duration::seconds(59), Duration::seconds(60)));
        assert!(room.is_idle(now + Duration::seconds(60), Duration::seconds(60)));
    }
}
