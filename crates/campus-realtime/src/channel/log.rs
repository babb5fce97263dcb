//! Bounded, ordered per-room message log.

use std::collections::VecDeque;

use campus_entity::room::ChatMessage;

/// FIFO log that retains the newest `capacity` messages.
///
/// Ids start at 1 and never repeat for the life of the log, even after the
/// oldest entries are evicted.
#[derive(Debug)]
pub struct MessageLog {
    entries: VecDeque<ChatMessage>,
    capacity: usize,
    next_id: u64,
}

impl MessageLog {
    /// An empty log.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Assigns the next id, builds the message and appends it, evicting the
    /// oldest entry at capacity.
    pub fn append(&mut self, build: impl FnOnce(u64) -> ChatMessage) -> &ChatMessage {
        let message = build(self.next_id);
        self.next_id += 1;
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(message);
        &self.entries[self.entries.len() - 1]
    }

    /// The newest `limit` messages, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<ChatMessage> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_core::types::{RoomId, UserId};
    use campus_entity::user::{DisplayAttrs, UserRole};
    use chrono::Utc;

    fn push(log: &mut MessageLog, body: &str) -> u64 {
        log.append(|id| ChatMessage {
            id,
            room_id: RoomId::from("campanile"),
            sender_user_id: UserId::from("ada"),
            sender: DisplayAttrs {
                display_name: "Ada".into(),
                avatar_url: None,
                role: UserRole::Student,
            },
            body: body.to_string(),
            server_timestamp: Utc::now(),
        })
        .id
    }

    #[test]
    fn test_evicts_oldest_at_capacity() {
        let mut log = MessageLog::new(3);
        for i in 0..5 {
            push(&mut log, &format!("m{i}"));
        }
        let ids: Vec<_> = log.recent(10).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(log.recent(usize::MAX).len(), 3);
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut log = MessageLog::new(10);
        for i in 0..4 {
            push(&mut log, &format!("m{i}"));
        }
        let bodies: Vec<_> = log.recent(2).into_iter().map(|m| m.body).collect();
        assert_eq!(bodies, vec!["m2", "m3"]);
        assert!(log.recent(0).is_empty());
    }
}
