//! Presence domain entities.

pub mod model;

pub use model::{Position, PresenceRecord};

use serde::{Deserialize, Serialize};

/// Self-reported availability shown next to a user on the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresenceStatus {
    /// Open to chat.
    #[default]
    Available,
    /// Do not disturb.
    Busy,
    /// In a meeting or lecture.
    InMeeting,
    /// Heads down.
    Studying,
    /// On a break.
    Break,
    /// Away from the keyboard.
    Away,
}

impl PresenceStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 6] = [
        Self::Available,
        Self::Busy,
        Self::InMeeting,
        Self::Studying,
        Self::Break,
        Self::Away,
    ];

    /// Return the status as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Busy => "busy",
            Self::InMeeting => "in-meeting",
            Self::Studying => "studying",
            Self::Break => "break",
            Self::Away => "away",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Busy => "Busy",
            Self::InMeeting => "In a Meeting",
            Self::Studying => "Studying",
            Self::Break => "On Break",
            Self::Away => "Away",
        }
    }
}

impl std::fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresenceStatus {
    type Err = campus_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                campus_core::AppError::validation(format!("Invalid presence status: '{s}'"))
            })
    }
}
