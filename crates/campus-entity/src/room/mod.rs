//! Room chat entities.

pub mod message;
pub mod roster;

pub use message::ChatMessage;
pub use roster::RosterEntry;
