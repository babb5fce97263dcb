//! # campus-realtime
//!
//! Real-time presence and room-messaging engine for the campus map.
//! Provides:
//!
//! - An immutable zone catalog loaded at startup
//! - A process-wide presence directory with heartbeat expiry
//! - Zone-scoped room channels with rosters, bounded message logs and fan-out
//! - An occupancy reconciler that expires silent sessions and corrects drift
//! - The synchronization gateway and a JSON connection driver for transports

pub mod catalog;
pub mod channel;
pub mod connection;
pub mod gateway;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod reconcile;
pub mod server;

pub use catalog::ZoneCatalog;
pub use channel::registry::RoomRegistry;
pub use connection::driver::ConnectionDriver;
pub use gateway::SyncGateway;
pub use presence::directory::PresenceDirectory;
pub use reconcile::reconciler::OccupancyReconciler;
pub use server::RealtimeEngine;
