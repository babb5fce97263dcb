//! Zone catalog entries as they appear in configuration.

use serde::{Deserialize, Serialize};

/// One `[[zones]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Stable zone id, e.g. `"doe-library"`.
    pub id: String,
    /// Name shown on the map.
    pub display_name: String,
    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,
    /// Maximum sessions in the zone's main room.
    pub capacity: u32,
    /// Free-form category (`academic`, `landmark`, ...).
    #[serde(default = "default_zone_type")]
    pub zone_type: String,
    /// Map x coordinate.
    #[serde(default)]
    pub x: f64,
    /// Map y coordinate.
    #[serde(default)]
    pub y: f64,
    /// Inactive zones are listed but cannot be entered.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Extra rooms inside the zone besides its main room.
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
}

/// A sub-room inside a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Room id, unique across the catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Maximum sessions.
    pub capacity: u32,
}

fn default_zone_type() -> String {
    "general".to_string()
}

fn default_true() -> bool {
    true
}
