//! Background sweep loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use super::reconciler::OccupancyReconciler;

/// Runs [`OccupancyReconciler::sweep`] every `interval` until a shutdown
/// signal arrives.
pub fn spawn_sweeper(
    reconciler: Arc<OccupancyReconciler>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        info!(interval_secs = interval.as_secs(), "Occupancy sweeper started");
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = reconciler.sweep().await;
                    debug!(?report, "Sweep tick");
                }
                _ = shutdown.recv() => {
                    info!("Occupancy sweeper stopping");
                    break;
                }
            }
        }
    })
}
