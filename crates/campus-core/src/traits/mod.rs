//! Core traits defined in `campus-core` and implemented or consumed by
//! other crates.

pub mod clock;
pub mod zone_source;

pub use clock::{Clock, ManualClock, SystemClock};
pub use zone_source::ZoneSource;
