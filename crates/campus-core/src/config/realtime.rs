//! Presence, room channel and reconciliation settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Real-time engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// A presence record or session is alive iff its last heartbeat is
    /// younger than this.
    #[serde(default = "default_heartbeat_timeout")]
    pub heartbeat_timeout_seconds: u64,
    /// Interval between reconciliation sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// Messages retained per room; the oldest is evicted first.
    #[serde(default = "default_log_capacity")]
    pub message_log_capacity: usize,
    /// History returned when a client asks for messages without a limit.
    #[serde(default = "default_history_limit")]
    pub default_history_limit: usize,
    /// Maximum chat body length in characters.
    #[serde(default = "default_max_message_length")]
    pub max_message_length: usize,
    /// Maximum custom status message length in characters.
    #[serde(default = "default_max_status_message_length")]
    pub max_status_message_length: usize,
    /// Outbound event queue per room session.
    #[serde(default = "default_session_buffer")]
    pub session_buffer_size: usize,
    /// Capacity of the global presence broadcast.
    #[serde(default = "default_presence_buffer")]
    pub presence_event_buffer: usize,
    /// How long an empty room keeps its log before it is destroyed.
    #[serde(default = "default_room_idle_grace")]
    pub room_idle_grace_seconds: u64,
    /// Maximum concurrent client connections per user.
    #[serde(default = "default_max_connections_per_user")]
    pub max_connections_per_user: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout_seconds: default_heartbeat_timeout(),
            sweep_interval_seconds: default_sweep_interval(),
            message_log_capacity: default_log_capacity(),
            default_history_limit: default_history_limit(),
            max_message_length: default_max_message_length(),
            max_status_message_length: default_max_status_message_length(),
            session_buffer_size: default_session_buffer(),
            presence_event_buffer: default_presence_buffer(),
            room_idle_grace_seconds: default_room_idle_grace(),
            max_connections_per_user: default_max_connections_per_user(),
        }
    }
}

impl RealtimeConfig {
    /// Rejects values that would make the engine misbehave.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.heartbeat_timeout_seconds == 0 {
            return Err(AppError::configuration(
                "realtime.heartbeat_timeout_seconds must be greater than zero",
            ));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(AppError::configuration(
                "realtime.sweep_interval_seconds must be greater than zero",
            ));
        }
        if self.message_log_capacity == 0 {
            return Err(AppError::configuration(
                "realtime.message_log_capacity must be greater than zero",
            ));
        }
        if self.session_buffer_size == 0 || self.presence_event_buffer == 0 {
            return Err(AppError::configuration(
                "realtime buffer sizes must be greater than zero",
            ));
        }
        if self.max_connections_per_user == 0 {
            return Err(AppError::configuration(
                "realtime.max_connections_per_user must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Heartbeat timeout as a chrono duration.
    pub fn heartbeat_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.heartbeat_timeout_seconds as i64)
    }

    /// Room idle grace as a chrono duration.
    pub fn room_idle_grace(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.room_idle_grace_seconds as i64)
    }

    /// Sweep interval as a std duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

fn default_heartbeat_timeout() -> u64 {
    15
}

fn default_sweep_interval() -> u64 {
    15
}

fn default_log_capacity() -> usize {
    200
}

fn default_history_limit() -> usize {
    50
}

fn default_max_message_length() -> usize {
    1000
}

fn default_max_status_message_length() -> usize {
    100
}

fn default_session_buffer() -> usize {
    256
}

fn default_presence_buffer() -> usize {
    1024
}

fn default_room_idle_grace() -> u64 {
    60
}

fn default_max_connections_per_user() -> usize {
    5
}
