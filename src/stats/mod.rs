//! Relay statistics
//!
//! Counters for packets flowing through a relay instance and its subscribers.
//! Drops are never surfaced as errors; these counters are where they show up.

pub mod metrics;

pub use metrics::{RelayStats, RelayStatsSnapshot, SubscriberStats};
