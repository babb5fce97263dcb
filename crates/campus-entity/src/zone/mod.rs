//! Zone (building) entities.

pub mod model;

pub use model::{RoomSpec, Zone};
