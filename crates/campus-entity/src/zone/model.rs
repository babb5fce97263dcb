//! Zone value object.

use serde::{Deserialize, Serialize};

use campus_core::config::zones::ZoneConfig;
use campus_core::types::{RoomId, ZoneId};

use crate::presence::Position;

/// A joinable room inside a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    /// Room id, unique across the catalog.
    pub id: RoomId,
    /// Display name.
    pub name: String,
    /// Maximum concurrent sessions.
    pub capacity: u32,
}

/// A named area of the campus map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Stable zone id.
    pub id: ZoneId,
    /// Name shown on the map.
    pub display_name: String,
    /// Optional blurb.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Capacity of the zone's main room.
    pub capacity: u32,
    /// Free-form category, e.g. `library` or `landmark`.
    pub zone_type: String,
    /// Map anchor.
    pub position: Position,
    /// Inactive zones are listed but cannot be joined or entered.
    pub is_active: bool,
    /// Joinable rooms. The first entry is always the main room.
    pub rooms: Vec<RoomSpec>,
}

impl Zone {
    /// The main room shares the zone id and capacity.
    pub fn main_room(&self) -> RoomSpec {
        RoomSpec {
            id: RoomId::main_of(&self.id),
            name: self.display_name.clone(),
            capacity: self.capacity,
        }
    }

    /// Look up one of the zone's rooms.
    pub fn room(&self, room_id: &RoomId) -> Option<&RoomSpec> {
        self.rooms.iter().find(|r| &r.id == room_id)
    }
}

impl From<ZoneConfig> for Zone {
    fn from(cfg: ZoneConfig) -> Self {
        let id = ZoneId::new(cfg.id);
        let mut rooms = vec![RoomSpec {
            id: RoomId::main_of(&id),
            name: cfg.display_name.clone(),
            capacity: cfg.capacity,
        }];
        rooms.extend(cfg.rooms.into_iter().map(|r| RoomSpec {
            id: RoomId::new(r.id),
            name: r.name,
            capacity: r.capacity,
        }));

        Self {
            id,
            display_name: cfg.display_name,
            description: cfg.description,
            capacity: cfg.capacity,
            zone_type: cfg.zone_type,
            position: Position::new(cfg.x, cfg.y),
            is_active: cfg.is_active,
            rooms,
        }
    }
}
