//! Relay instance
//!
//! [`PubSub`] binds one publisher connection to any number of subscriber
//! connections.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::connection::{Conn, SrtConnection};
use crate::error::Error;
use crate::stats::{RelayStats, RelayStatsSnapshot, SubscriberStats};

use super::broadcast;
use super::config::PubSubConfig;
use super::registry::Registry;
use super::shutdown::Shutdown;

/// One-publisher, many-subscriber packet relay
///
/// Share it between tasks with an `Arc`. Dropping the last handle stops the
/// broadcast pump.
pub struct PubSub<C: SrtConnection> {
    config: PubSubConfig,
    ingest: mpsc::Sender<C::Packet>,
    registry: Arc<Registry<C::Packet>>,
    shutdown: Shutdown,
    publisher_claimed: AtomicBool,
    stats: Arc<RelayStats>,
    pump: JoinHandle<()>,
}

impl<C: SrtConnection> PubSub<C> {
    /// Create a relay with default configuration
    ///
    /// Must be called from within a Tokio runtime; the broadcast pump is
    /// spawned onto it.
    pub fn new() -> Self {
        Self::with_config(PubSubConfig::default())
    }

    /// Create a relay with custom configuration
    pub fn with_config(config: PubSubConfig) -> Self {
        let stats = Arc::new(RelayStats::new());
        let registry = Arc::new(Registry::new(Arc::clone(&stats)));
        let shutdown = Shutdown::new();
        let (ingest, ingest_rx) = mpsc::channel(config.ingest_capacity.max(1));

        let pump = tokio::spawn(broadcast::run(
            ingest_rx,
            Arc::clone(&registry),
            shutdown.listener(),
            Arc::clone(&stats),
        ));

        Self {
            config,
            ingest,
            registry,
            shutdown,
            publisher_claimed: AtomicBool::new(false),
            stats,
            pump,
        }
    }

    /// Get the relay configuration
    pub fn config(&self) -> &PubSubConfig {
        &self.config
    }

    /// Relay packets read from `conn` to all subscribers
    ///
    /// Runs until the publisher stream ends and returns the error that ended
    /// it ([`Error::Eof`] on a normal end). Whatever the error, the relay is
    /// shut down afterwards and every subscriber is released. Dropping the
    /// returned future before it completes shuts the relay down as well.
    ///
    /// Only one publisher is accepted per instance; later calls return
    /// [`Error::AlreadyPublishing`] without side effects.
    pub async fn publish(&self, mut conn: C) -> Error {
        let socket_id = conn.socket_id();

        if self.publisher_claimed.swap(true, Ordering::AcqRel) {
            tracing::warn!(socket_id = socket_id, "Publisher rejected: stream already published");
            return Error::AlreadyPublishing;
        }

        tracing::info!(socket_id = socket_id, "Publisher registered");

        // Fires on return and on cancellation alike
        let shutdown_on_exit = self.shutdown.fire_on_drop();

        let err = loop {
            let packet = match conn.read_packet().await {
                Ok(packet) => packet,
                Err(e) => break e,
            };

            self.stats.record_read();

            match self.ingest.try_send(packet) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.stats.record_ingest_drop();
                    tracing::debug!(socket_id = socket_id, "Incoming queue full, packet dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    self.stats.record_ingest_drop();
                }
            }
        };

        drop(shutdown_on_exit);

        tracing::info!(
            socket_id = socket_id,
            error = %err,
            subscribers = self.registry.len(),
            "Publisher disconnected, shutting down relay"
        );

        err
    }

    /// Relay packets to `conn` until it fails or the publisher stream ends
    ///
    /// Only packets broadcast after registration are delivered. Returns the
    /// write error that ended the subscription, or [`Error::Eof`] once the
    /// relay shuts down. A subscriber arriving after shutdown returns
    /// [`Error::Eof`] right away.
    pub async fn subscribe(&self, mut conn: C) -> Error {
        let socket_id = conn.socket_id();

        let (_registration, mut queue) = match self
            .registry
            .register(socket_id, self.config.subscriber_queue_capacity)
        {
            Ok(registered) => registered,
            Err(e) => {
                tracing::warn!(socket_id = socket_id, error = %e, "Subscriber rejected");
                return e;
            }
        };

        let mut shutdown = self.shutdown.listener();

        loop {
            tokio::select! {
                biased;

                _ = shutdown.fired() => return Error::Eof,

                packet = queue.recv() => {
                    let Some(packet) = packet else { return Error::Eof };
                    if let Err(e) = conn.write_packet(packet).await {
                        tracing::debug!(socket_id = socket_id, error = %e, "Subscriber write failed");
                        return e;
                    }
                }
            }
        }
    }

    /// Publish from a type-erased connection
    ///
    /// Fails with [`Error::NotSrtConnection`] if `conn` is not a `C`.
    pub async fn publish_conn(&self, conn: Box<dyn Conn>) -> Error {
        match downcast::<C>(conn) {
            Ok(conn) => self.publish(conn).await,
            Err(e) => e,
        }
    }

    /// Subscribe with a type-erased connection
    ///
    /// Fails with [`Error::NotSrtConnection`] if `conn` is not a `C`; the
    /// registry is left untouched.
    pub async fn subscribe_conn(&self, conn: Box<dyn Conn>) -> Error {
        match downcast::<C>(conn) {
            Ok(conn) => self.subscribe(conn).await,
            Err(e) => e,
        }
    }

    /// Number of registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Per-subscriber counters, ordered by socket ID
    pub fn subscriber_stats(&self) -> Vec<SubscriberStats> {
        self.registry.subscriber_stats()
    }

    /// Relay-wide counters
    pub fn stats(&self) -> RelayStatsSnapshot {
        self.stats.snapshot()
    }

    /// Whether the publisher stream has ended
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_fired()
    }
}

impl<C: SrtConnection> Default for PubSub<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: SrtConnection> Drop for PubSub<C> {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

fn downcast<C: SrtConnection>(conn: Box<dyn Conn>) -> Result<C, Error> {
    let socket_id = conn.socket_id();

    match conn.into_any().downcast::<C>() {
        Ok(conn) => Ok(*conn),
        Err(_) => {
            tracing::warn!(socket_id = socket_id, "Rejected connection: not a SRT connection");
            Err(Error::NotSrtConnection)
        }
    }
}
