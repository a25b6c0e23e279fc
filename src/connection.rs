//! Connection traits
//!
//! The relay is written against two traits provided by the transport:
//!
//! - [`Conn`]: any accepted connection, identified by its socket ID.
//! - [`SrtConnection`]: the transport's concrete SRT connection, able to
//!   read and write whole packets.
//!
//! [`PubSub`](crate::PubSub) is generic over one `SrtConnection` type, so
//! the typed entry points cannot be handed the wrong kind of connection.
//! Servers holding type-erased `Box<dyn Conn>` values go through the
//! `*_conn` entry points, which downcast and reject anything else.

use std::any::Any;
use std::future::Future;

use crate::error::Result;

/// A connection accepted by the server
pub trait Conn: Send + 'static {
    /// Stable socket ID, unique among live connections
    fn socket_id(&self) -> u32;

    /// Convert into `Any` for downcasting to a concrete connection type
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

/// An SRT connection carrying whole packets
pub trait SrtConnection: Conn + Sized {
    /// Packet type carried by the connection
    type Packet: Clone + Send + 'static;

    /// Read the next packet
    ///
    /// Blocks until a packet is available. Any error is terminal for the
    /// stream; a normal end of stream is reported as [`Error::Eof`](crate::Error::Eof).
    fn read_packet(&mut self) -> impl Future<Output = Result<Self::Packet>> + Send;

    /// Write a packet to the peer
    ///
    /// Any error is terminal for the stream.
    fn write_packet(&mut self, packet: Self::Packet) -> impl Future<Output = Result<()>> + Send;
}
