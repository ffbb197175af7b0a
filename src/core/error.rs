//! Error types for the S3200 point engine.

use thiserror::Error;

/// Errors raised by the bus transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// TCP connect (or reconnect) to the controller failed.
    #[error("connect to {addr} failed: {reason}")]
    Connect { addr: String, reason: String },

    /// The request was sent but the exchange failed (timeout, exception
    /// response, broken socket). The connection is dropped and re-opened
    /// lazily on the next transaction.
    #[error("bus error: {0}")]
    Bus(String),
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The point id is not in the active catalog.
    #[error("unknown point: {0}")]
    UnknownPoint(String),

    /// The point is read-only, or lives in a register space that cannot
    /// be written with FC06.
    #[error("point {0} is not writable")]
    NotWritable(String),

    /// The supplied value cannot be encoded for the point's value kind.
    #[error("cannot encode value for {point}: {reason}")]
    Encode { point: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
