//! Occupancy reconciliation and heartbeat expiry.

pub mod reconciler;
pub mod task;

pub use reconciler::{OccupancyReconciler, SweepReport};
pub use task::spawn_sweeper;
