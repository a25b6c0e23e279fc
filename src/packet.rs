//! SRT data packet
//!
//! The relay only needs packets to be cloneable; [`SrtPacket`] is the data
//! packet representation handed around by SRT connections.

use bytes::Bytes;

/// An SRT data packet
///
/// Cloning is cheap: header fields are copied per clone while the payload
/// is reference counted. The payload is immutable, so clones never observe
/// each other's header rewrites (e.g. the destination socket ID set on write).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtPacket {
    /// Packet sequence number (31 bits on the wire)
    pub sequence_number: u32,
    /// Message number (26 bits on the wire)
    pub message_number: u32,
    /// Timestamp in microseconds relative to connection start
    pub timestamp: u32,
    /// Socket ID of the receiving peer
    pub destination_socket_id: u32,
    /// Packet payload
    pub payload: Bytes,
}

impl SrtPacket {
    /// Create a data packet with the given sequence number and payload
    pub fn new(sequence_number: u32, payload: impl Into<Bytes>) -> Self {
        Self {
            sequence_number,
            message_number: 0,
            timestamp: 0,
            destination_socket_id: 0,
            payload: payload.into(),
        }
    }

    /// Set the timestamp
    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set the message number
    pub fn with_message_number(mut self, message_number: u32) -> Self {
        self.message_number = message_number;
        self
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
