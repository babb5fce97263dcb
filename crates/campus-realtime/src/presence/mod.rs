//! Presence: who is online and where.

pub mod directory;
pub mod update;

pub use directory::PresenceDirectory;
pub use update::{FieldUpdate, PresenceUpdate};
