//! Subscriber registry
//!
//! Maps subscriber socket IDs to their packet queues. The broadcast pump is
//! the only writer to these queues; each queue's receiver is owned by the
//! subscribe call that registered it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::{Error, Result};
use crate::stats::{RelayStats, SubscriberStats};

/// Sender side of one subscriber queue plus its counters
struct SubscriberEntry<P> {
    tx: mpsc::Sender<P>,
    enqueued: u64,
    dropped: u64,
}

/// Outcome of fanning one packet out to all subscribers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FanOut {
    pub enqueued: u64,
    pub dropped: u64,
}

pub(crate) struct Registry<P> {
    subscribers: Mutex<HashMap<u32, SubscriberEntry<P>>>,
    stats: Arc<RelayStats>,
}

impl<P: Clone> Registry<P> {
    pub(crate) fn new(stats: Arc<RelayStats>) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            stats,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u32, SubscriberEntry<P>>> {
        // Entries stay consistent across a panic; keep serving
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new subscriber queue
    ///
    /// The entry lives as long as the returned [`Registration`]. A socket ID
    /// that is already registered is rejected without touching the existing entry.
    pub(crate) fn register(
        self: &Arc<Self>,
        socket_id: u32,
        capacity: usize,
    ) -> Result<(Registration<P>, mpsc::Receiver<P>)> {
        let (tx, rx) = mpsc::channel(capacity.max(1));

        let count = {
            let mut subscribers = self.lock();
            if subscribers.contains_key(&socket_id) {
                return Err(Error::DuplicateSocketId(socket_id));
            }
            subscribers.insert(
                socket_id,
                SubscriberEntry {
                    tx,
                    enqueued: 0,
                    dropped: 0,
                },
            );
            subscribers.len()
        };

        self.stats.record_join();
        tracing::info!(socket_id = socket_id, subscribers = count, "Subscriber added");

        let registration = Registration {
            registry: Arc::clone(self),
            socket_id,
        };
        Ok((registration, rx))
    }

    fn unregister(&self, socket_id: u32) {
        let (entry, count) = {
            let mut subscribers = self.lock();
            let entry = subscribers.remove(&socket_id);
            (entry, subscribers.len())
        };

        if let Some(entry) = entry {
            self.stats.record_leave();
            tracing::info!(
                socket_id = socket_id,
                subscribers = count,
                enqueued = entry.enqueued,
                dropped = entry.dropped,
                "Subscriber removed"
            );
        }
    }

    /// Offer a copy of `packet` to every registered subscriber
    ///
    /// The lock is held for the whole pass, so a subscriber either sees this
    /// packet or was not registered when it was broadcast. Full queues drop
    /// their copy; nothing here waits.
    pub(crate) fn fan_out(&self, packet: &P) -> FanOut {
        let mut result = FanOut::default();
        let mut subscribers = self.lock();

        for (socket_id, entry) in subscribers.iter_mut() {
            match entry.tx.try_send(packet.clone()) {
                Ok(()) => {
                    entry.enqueued += 1;
                    result.enqueued += 1;
                }
                Err(TrySendError::Full(_)) => {
                    entry.dropped += 1;
                    result.dropped += 1;
                    tracing::debug!(socket_id = *socket_id, "Subscriber queue full, packet dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    // Owner is exiting; its registration is about to be released
                    entry.dropped += 1;
                    result.dropped += 1;
                }
            }
        }

        result
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().len()
    }

    pub(crate) fn subscriber_stats(&self) -> Vec<SubscriberStats> {
        let mut stats: Vec<SubscriberStats> = self
            .lock()
            .iter()
            .map(|(socket_id, entry)| SubscriberStats {
                socket_id: *socket_id,
                enqueued: entry.enqueued,
                dropped: entry.dropped,
            })
            .collect();
        stats.sort_by_key(|s| s.socket_id);
        stats
    }
}

/// Keeps a subscriber registered; removes the entry on drop
///
/// Dropping runs on every exit path of a subscribe call, including
/// cancellation of the task driving it.
pub(crate) struct Registration<P: Clone> {
    registry: Arc<Registry<P>>,
    socket_id: u32,
}

impl<P: Clone> Drop for Registration<P> {
    fn drop(&mut self) {
        self.registry.unregister(self.socket_id);
    }
}
