//! Packet fan-out from one publisher to many subscribers
//!
//! # Architecture
//!
//! ```text
//!   [Publisher conn]
//!         │ read_packet()
//!         ▼
//!   PubSub::publish ──try_send──► ingest (mpsc, 1024)
//!                                     │
//!                                     ▼
//!                              broadcast pump ──── locks ────┐
//!                                     │                      │
//!                  ┌──────────────────┼──────────────────┐   ▼
//!                  │ try_send(clone)  │                  │  Registry
//!                  ▼                  ▼                  ▼  HashMap<socket_id, queue>
//!            queue (1024)       queue (1024)       queue (1024)
//!                  │                  │                  │
//!                  ▼                  ▼                  ▼
//!          PubSub::subscribe  PubSub::subscribe  PubSub::subscribe
//!                  │ write_packet()   │                  │
//!                  ▼                  ▼                  ▼
//!            [Subscriber]       [Subscriber]       [Subscriber]
//! ```
//!
//! # Backpressure
//!
//! Neither the publisher nor the pump ever waits on a queue. A packet that
//! does not fit into the ingest channel or into a subscriber queue is dropped
//! and counted, so a slow subscriber only loses its own packets.
//!
//! # Shutdown
//!
//! When the publisher stream ends, a one-shot latch fires. The pump exits
//! without draining the ingest channel and every subscriber returns
//! [`Error::Eof`](crate::Error::Eof).

mod broadcast;
pub mod config;
mod registry;
mod relay;
mod shutdown;


pub use config::PubSubConfig;
pub use relay::PubSub;
