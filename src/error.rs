//! # Error Types
//!
//! This module defines error types used throughout the matriz library.

use thiserror::Error;

/// Main error type for matriz operations
#[derive(Debug, Error)]
pub enum MatrizError {
    /// Transport-level errors (open, configure, connection)
    #[error("Transport error: {0}")]
    Transport(String),

    /// A frame write was accepted only partially by the device.
    ///
    /// The protocol has no resynchronization marker, so a short write leaves
    /// the module mid-frame and the connection must be treated as dead.
    #[error("Short write: {written} of {expected} bytes reached the device")]
    ShortWrite {
        /// Bytes the transport accepted
        written: usize,
        /// Bytes the frame required
        expected: usize,
    },

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
