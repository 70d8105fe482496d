//! Order book error types.
//!
//! Engine operations surface their outcome by return value: a rejected or
//! duplicate add returns an empty trade list, a cancel of a missing id is a
//! no-op. This type covers the genuinely fallible edges around the engine:
//! configuration and snapshot serialization.

use std::fmt;

/// Errors that can occur around the order book.
#[derive(Debug)]
#[non_exhaustive]
pub enum OrderBookError {
    /// Expiry cutoff hour outside `0..24`
    InvalidCutoffHour {
        /// The rejected hour
        hour: u32,
    },

    /// Error while serializing snapshot data
    SerializationError {
        /// Underlying error message
        message: String,
    },

    /// Error while deserializing snapshot data
    DeserializationError {
        /// Underlying error message
        message: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidCutoffHour { hour } => {
                write!(f, "invalid expiry cutoff hour: {hour} (expected 0..24)")
            }
            OrderBookError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
            OrderBookError::DeserializationError { message } => {
                write!(f, "deserialization error: {message}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
