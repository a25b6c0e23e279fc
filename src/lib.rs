//! One-to-many live packet relay for SRT servers
//!
//! A single publishing connection feeds packets into a [`PubSub`] instance,
//! and every subscriber connection attached to it receives its own copy of
//! each packet relayed after it joined.
//!
//! ```no_run
//! use srt_pubsub::{PubSub, SrtConnection};
//!
//! async fn relay<C: SrtConnection>(publisher: C, subscriber: C) {
//!     let pubsub = std::sync::Arc::new(PubSub::<C>::new());
//!
//!     let sub = std::sync::Arc::clone(&pubsub);
//!     tokio::spawn(async move {
//!         let err = sub.subscribe(subscriber).await;
//!         tracing::info!(error = %err, "subscriber finished");
//!     });
//!
//!     // Returns once the publisher stream ends; all subscribers are released.
//!     let err = pubsub.publish(publisher).await;
//!     assert!(err.is_eof());
//! }
//! ```

pub mod connection;
pub mod error;
pub mod packet;
pub mod pubsub;
pub mod stats;

pub use connection::{Conn, SrtConnection};
pub use error::{Error, Result};
pub use packet::SrtPacket;
pub use pubsub::{PubSub, PubSubConfig};
pub use stats::{RelayStatsSnapshot, SubscriberStats};
