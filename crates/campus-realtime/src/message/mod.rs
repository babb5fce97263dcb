//! Wire and event message types, plus input validation.

pub mod types;
pub mod validator;

pub use types::{InboundCommand, OutboundMessage, PresenceChanged, RoomEvent};
