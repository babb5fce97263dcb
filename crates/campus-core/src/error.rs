//! Unified application error types.
//!
//! Every crate in the workspace returns [`AppError`]. Presence and room
//! failures carry their own [`ErrorKind`] so the transport layer can map
//! them to a stable external code without string matching.

use std::fmt;
use thiserror::Error;

/// Error categorization shared by the whole service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A zone or room id that the catalog does not know (or that is closed).
    InvalidZone,
    /// The room already holds `capacity` sessions.
    RoomFull,
    /// The session is not (or no longer) part of a room roster.
    NotSubscribed,
    /// A presence record or session outlived its heartbeat timeout.
    ///
    /// Only the reconciliation sweep produces this kind; it never leaves
    /// the realtime crate.
    StalePresence,
    /// Input validation failed.
    Validation,
    /// The caller tried to write state owned by another user.
    Forbidden,
    /// The requested resource was not found.
    NotFound,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
    /// The service is shutting down or temporarily unavailable.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Machine-readable code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidZone => "INVALID_ZONE",
            Self::RoomFull => "ROOM_FULL",
            Self::NotSubscribed => "NOT_SUBSCRIBED",
            Self::StalePresence => "STALE_PRESENCE",
            Self::Validation => "VALIDATION_ERROR",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The unified application error.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Unknown or inactive zone / room.
    pub fn invalid_zone(id: impl fmt::Display) -> Self {
        Self::new(ErrorKind::InvalidZone, format!("Unknown zone or room '{id}'"))
    }

    /// Room at capacity.
    pub fn room_full(room: impl fmt::Display, capacity: u32) -> Self {
        Self::new(
            ErrorKind::RoomFull,
            format!("Room '{room}' is full (capacity {capacity})"),
        )
    }

    /// Session not registered in any roster.
    pub fn not_subscribed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotSubscribed, message)
    }

    /// Heartbeat timeout elapsed.
    pub fn stale_presence(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StalePresence, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a service-unavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    /// Whether this error has the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
