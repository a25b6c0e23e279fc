//! Broadcast pump
//!
//! Single task moving packets from the ingest channel into every
//! registered subscriber queue.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::stats::RelayStats;

use super::registry::Registry;
use super::shutdown::ShutdownListener;

/// Run the pump until shutdown fires or the ingest channel closes
///
/// Packets still sitting in the ingest channel at shutdown are dropped.
pub(crate) async fn run<P: Clone>(
    mut ingest: mpsc::Receiver<P>,
    registry: Arc<Registry<P>>,
    mut shutdown: ShutdownListener,
    stats: Arc<RelayStats>,
) {
    loop {
        tokio::select! {
            biased;

            _ = shutdown.fired() => break,

            packet = ingest.recv() => {
                let Some(packet) = packet else { break };
                let result = registry.fan_out(&packet);
                stats.record_broadcast(result.enqueued, result.dropped);
            }
        }
    }

    tracing::debug!(pending = ingest.len(), "Exiting broadcast loop");
}
