//! # campus-entity
//!
//! Domain value types shared by the realtime engine and the HTTP layer.
//! Every type derives `Debug`, `Clone`, `Serialize` and `Deserialize`;
//! none of them owns any synchronization.

pub mod presence;
pub mod room;
pub mod user;
pub mod zone;
