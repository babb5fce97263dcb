//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::info;

use campus_core::config::RealtimeConfig;
use campus_core::error::AppError;
use campus_core::traits::{Clock, SystemClock};

use crate::catalog::ZoneCatalog;
use crate::channel::registry::RoomRegistry;
use crate::connection::pool::ConnectionPool;
use crate::gateway::SyncGateway;
use crate::metrics::{MetricsSnapshot, RealtimeMetrics};
use crate::presence::directory::PresenceDirectory;
use crate::reconcile::reconciler::OccupancyReconciler;
use crate::reconcile::task::spawn_sweeper;

/// Point-in-time engine gauges plus counters.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStats {
    /// Open client connections.
    pub connections: usize,
    /// Users with at least one connection.
    pub connected_users: usize,
    /// Live presence records.
    pub online_users: usize,
    /// Live room channels.
    pub rooms: usize,
    /// Rostered sessions.
    pub sessions: usize,
    /// Zones in the catalog.
    pub zones: usize,
    /// Cumulative counters.
    pub metrics: MetricsSnapshot,
}

/// Central real-time engine that coordinates all subsystems.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Zone catalog.
    pub catalog: Arc<ZoneCatalog>,
    /// Presence directory.
    pub presence: Arc<PresenceDirectory>,
    /// Room registry.
    pub rooms: Arc<RoomRegistry>,
    /// Connection pool.
    pub connections: Arc<ConnectionPool>,
    /// Command/event boundary.
    pub gateway: Arc<SyncGateway>,
    /// Occupancy reconciler.
    pub reconciler: Arc<OccupancyReconciler>,
    /// Metrics collector.
    pub metrics: Arc<RealtimeMetrics>,
    /// Engine settings.
    config: RealtimeConfig,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine on the system clock.
    pub fn new(config: RealtimeConfig, catalog: ZoneCatalog) -> Self {
        Self::with_clock(config, catalog, Arc::new(SystemClock))
    }

    /// Creates a new real-time engine on the given clock.
    pub fn with_clock(config: RealtimeConfig, catalog: ZoneCatalog, clock: Arc<dyn Clock>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RealtimeMetrics::new());
        let catalog = Arc::new(catalog);
        let presence = Arc::new(PresenceDirectory::new(
            catalog.clone(),
            clock.clone(),
            config.heartbeat_timeout(),
            config.presence_event_buffer,
            metrics.clone(),
        ));
        let rooms = Arc::new(RoomRegistry::new(
            catalog.clone(),
            clock.clone(),
            config.clone(),
            metrics.clone(),
        ));
        let connections = Arc::new(ConnectionPool::new());
        let gateway = Arc::new(SyncGateway::new(
            catalog.clone(),
            presence.clone(),
            rooms.clone(),
            connections.clone(),
            clock,
            config.clone(),
            metrics.clone(),
        ));
        let reconciler = Arc::new(OccupancyReconciler::new(
            presence.clone(),
            rooms.clone(),
            metrics.clone(),
        ));

        info!(zones = catalog.len(), "Real-time engine initialized");

        Self {
            catalog,
            presence,
            rooms,
            connections,
            gateway,
            reconciler,
            metrics,
            config,
            shutdown_tx,
        }
    }

    /// Starts the periodic reconciliation sweep. It stops on shutdown.
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        spawn_sweeper(
            self.reconciler.clone(),
            self.config.sweep_interval(),
            self.shutdown_receiver(),
        )
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Engine gauges and counters.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            connections: self.connections.connection_count(),
            connected_users: self.connections.user_count(),
            online_users: self.presence.online_count(),
            rooms: self.rooms.room_count(),
            sessions: self.rooms.session_count(),
            zones: self.catalog.len(),
            metrics: self.metrics.snapshot(),
        }
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        info!("Shutting down real-time engine");

        // Signal all tasks to stop
        let _ = self.shutdown_tx.send(());

        // Close all connections
        self.gateway.close_all().await;

        info!("Real-time engine shut down");
        Ok(())
    }
}
