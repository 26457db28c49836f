//! Error types for the B+ tree.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
/// This is a common Rust pattern (see `std::io::Result`).
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors surfaced by the crate.
///
/// A missing key is not an error: `delete` and `contains` report it through
/// their `bool` return value.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading or writing a snapshot.
    ///
    /// This wraps `std::io::Error` from file open/read/write operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tree creation was asked for an order outside `MIN_ORDER..=MAX_ORDER`.
    #[error("Invalid order {0}: must be between 3 and 65536")]
    InvalidOrder(usize),

    /// A snapshot could not be decoded into a valid tree.
    ///
    /// Covers truncated streams, impossible counts, bad flag bytes and
    /// trees that decode but break the structural invariants.
    #[error("Corrupt snapshot: {0}")]
    CorruptData(String),

    /// A front-end command line could not be parsed.
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

impl Error {
    pub(crate) fn corrupt(msg: impl Into<String>) -> Self {
        Error::CorruptData(msg.into())
    }
}
