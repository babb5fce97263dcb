//! Room channels: per-room rosters, message logs and fan-out.

pub mod log;
pub mod registry;
pub mod room;
pub mod session;
pub mod subscription;

pub use registry::{RoomRegistry, Subscription};
pub use room::Room;
pub use session::RoomSession;
