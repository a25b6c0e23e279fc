//! Statistics and metrics for relay instances

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by the publish path, the broadcast pump and subscribers
#[derive(Debug, Default)]
pub struct RelayStats {
    packets_read: AtomicU64,
    ingest_dropped: AtomicU64,
    packets_broadcast: AtomicU64,
    packets_fanned_out: AtomicU64,
    subscriber_dropped: AtomicU64,
    subscribers_joined: AtomicU64,
    subscribers_left: AtomicU64,
}

impl RelayStats {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_read(&self) {
        self.packets_read.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_ingest_drop(&self) {
        self.ingest_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one packet taken off the ingest channel and its fan-out result
    pub(crate) fn record_broadcast(&self, enqueued: u64, dropped: u64) {
        self.packets_broadcast.fetch_add(1, Ordering::Relaxed);
        self.packets_fanned_out.fetch_add(enqueued, Ordering::Relaxed);
        self.subscriber_dropped.fetch_add(dropped, Ordering::Relaxed);
    }

    pub(crate) fn record_join(&self) {
        self.subscribers_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_leave(&self) {
        self.subscribers_left.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of all counters
    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            packets_read: self.packets_read.load(Ordering::Relaxed),
            ingest_dropped: self.ingest_dropped.load(Ordering::Relaxed),
            packets_broadcast: self.packets_broadcast.load(Ordering::Relaxed),
            packets_fanned_out: self.packets_fanned_out.load(Ordering::Relaxed),
            subscriber_dropped: self.subscriber_dropped.load(Ordering::Relaxed),
            subscribers_joined: self.subscribers_joined.load(Ordering::Relaxed),
            subscribers_left: self.subscribers_left.load(Ordering::Relaxed),
        }
    }
}

/// Relay-wide statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStatsSnapshot {
    /// Packets read from the publisher
    pub packets_read: u64,
    /// Packets dropped because the ingest channel was full
    pub ingest_dropped: u64,
    /// Packets taken off the ingest channel by the broadcast pump
    pub packets_broadcast: u64,
    /// Packet copies enqueued to subscriber queues
    pub packets_fanned_out: u64,
    /// Packet copies dropped because a subscriber queue was full or closing
    pub subscriber_dropped: u64,
    /// Subscribers ever registered
    pub subscribers_joined: u64,
    /// Subscribers unregistered
    pub subscribers_left: u64,
}

impl RelayStatsSnapshot {
    /// Subscribers currently registered
    pub fn active_subscribers(&self) -> u64 {
        self.subscribers_joined.saturating_sub(self.subscribers_left)
    }

    /// Fraction of packet copies dropped at fan-out
    pub fn fan_out_drop_ratio(&self) -> f64 {
        let total = self.packets_fanned_out + self.subscriber_dropped;
        if total > 0 {
            self.subscriber_dropped as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Per-subscriber statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberStats {
    /// Socket ID of the subscriber connection
    pub socket_id: u32,
    /// Packets placed in this subscriber's queue, written or not
    pub enqueued: u64,
    /// Packets dropped because this subscriber's queue was full or closing
    pub dropped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_stats_new() {
        let stats = RelayStats::new().snapshot();
        assert_eq!(stats, RelayStatsSnapshot::default());
        assert_eq!(stats.active_subscribers(), 0);
    }

    #[test]
    fn test_record_broadcast() {
        let stats = RelayStats::new();
        stats.record_broadcast(3, 1);
        stats.record_broadcast(4, 0);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.packets_broadcast, 2);
        assert_eq!(snapshot.packets_fanned_out, 7);
        assert_eq!(snapshot.subscriber_dropped, 1);
    }

    #[test]
    fn test_active_subscribers() {
        let stats = RelayStats::new();
        stats.record_join();
        stats.record_join();
        stats.record_leave();

        assert_eq!(stats.snapshot().active_subscribers(), 1);
    }

    #[test]
    fn test_fan_out_drop_ratio() {
        let mut snapshot = RelayStatsSnapshot::default();
        assert_eq!(snapshot.fan_out_drop_ratio(), 0.0);

        snapshot.packets_fanned_out = 3;
        snapshot.subscriber_dropped = 1;
        assert!((snapshot.fan_out_drop_ratio() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingest_counters() {
        let stats = RelayStats::new();
        stats.record_read();
        stats.record_read();
        stats.record_ingest_drop();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.packets_read, 2);
        assert_eq!(snapshot.ingest_dropped, 1);
    }
}
