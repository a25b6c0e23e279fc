//! Error types
//!
//! Every terminal outcome of a publish or subscribe call is an [`Error`],
//! including the normal end of a stream ([`Error::Eof`]).

use std::io;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for relay operations and connection I/O
#[derive(Debug)]
pub enum Error {
    /// Normal end of stream
    Eof,
    /// Transport failure reported by a connection
    Io(io::Error),
    /// The connection is not of the relay's SRT connection type
    NotSrtConnection,
    /// The instance already has (or had) a publisher
    AlreadyPublishing,
    /// A subscriber with this socket ID is already registered
    DuplicateSocketId(u32),
}

impl Error {
    /// Whether this error marks a normal end of stream
    pub fn is_eof(&self) -> bool {
        matches!(self, Error::Eof)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Eof => write!(f, "End of stream"),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::NotSrtConnection => {
                write!(f, "The provided connection is not a SRT connection")
            }
            Error::AlreadyPublishing => write!(f, "Stream already has a publisher"),
            Error::DuplicateSocketId(id) => {
                write!(f, "Subscriber already registered for socket {:#010x}", id)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}
