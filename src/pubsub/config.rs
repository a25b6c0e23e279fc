//! Relay configuration

/// Default capacity of the ingest channel and of each subscriber queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Relay configuration options
#[derive(Debug, Clone)]
pub struct PubSubConfig {
    /// Packets buffered between the publisher and the broadcast pump
    pub ingest_capacity: usize,

    /// Packets buffered per subscriber before new packets are dropped
    pub subscriber_queue_capacity: usize,
}

impl Default for PubSubConfig {
    fn default() -> Self {
        Self {
            ingest_capacity: DEFAULT_QUEUE_CAPACITY,
            subscriber_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl PubSubConfig {
    /// Set the ingest channel capacity (at least 1)
    pub fn ingest_capacity(mut self, capacity: usize) -> Self {
        self.ingest_capacity = capacity.max(1);
        self
    }

    /// Set the per-subscriber queue capacity (at least 1)
    pub fn subscriber_queue_capacity(mut self, capacity: usize) -> Self {
        self.subscriber_queue_capacity = capacity.max(1);
        self
    }
}
