//! Partial presence updates.

use campus_core::types::ZoneId;
use campus_entity::presence::{Position, PresenceRecord, PresenceStatus};
use campus_entity::user::DisplayAttrs;

/// How an upsert treats one optional field.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FieldUpdate<T> {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Replace with a value.
    Set(T),
    /// Reset to `None`.
    Clear,
}

impl<T> FieldUpdate<T> {
    /// `Some` sets, `None` clears.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Set(v),
            None => Self::Clear,
        }
    }

    /// Apply to a slot.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Self::Keep => {}
            Self::Set(v) => *slot = Some(v),
            Self::Clear => *slot = None,
        }
    }
}

/// A partial update to one user's presence record.
///
/// The default value is a plain heartbeat: it changes nothing but the
/// heartbeat timestamp.
#[derive(Debug, Clone, Default)]
pub struct PresenceUpdate {
    /// Display attributes to record.
    pub display: Option<DisplayAttrs>,
    /// Zone change.
    pub zone_id: FieldUpdate<ZoneId>,
    /// Position change.
    pub position: FieldUpdate<Position>,
    /// Status change.
    pub status: Option<PresenceStatus>,
    /// Status line change.
    pub status_message: FieldUpdate<String>,
}

impl PresenceUpdate {
    /// Refresh the heartbeat only.
    pub fn heartbeat() -> Self {
        Self::default()
    }

    /// Record display attributes.
    pub fn with_display(mut self, display: DisplayAttrs) -> Self {
        self.display = Some(display);
        self
    }

    /// Move into a zone, or out of every zone with `None`.
    pub fn with_zone(mut self, zone_id: Option<ZoneId>) -> Self {
        self.zone_id = FieldUpdate::from_option(zone_id);
        self
    }

    /// Move on the map.
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = FieldUpdate::Set(position);
        self
    }

    /// Change status and status line together.
    pub fn with_status(mut self, status: PresenceStatus, message: Option<String>) -> Self {
        self.status = Some(status);
        self.status_message = FieldUpdate::from_option(message);
        self
    }

    /// Produces the next record from the current one.
    pub(crate) fn apply_to(self, record: &mut PresenceRecord) {
        if let Some(display) = self.display {
            record.display = Some(display);
        }
        self.zone_id.apply(&mut record.zone_id);
        self.position.apply(&mut record.position);
        if let Some(status) = self.status {
            record.status = status;
        }
        self.status_message.apply(&mut record.status_message);
    }
}
