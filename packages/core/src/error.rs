//! Error types for the core layer.

use crate::address::Address;
use crate::field::FieldKind;
use crate::point::{Axis, PointKind};

/// Errors raised while editing or synchronizing outbreak records.
///
/// Programmer errors (`OutOfRange`, `UnknownField`) abort the calling
/// operation. `MalformedSnapshot` and `InvalidCoordinateInput` are recovered
/// at the boundary that produced them and leave local state untouched.
/// `RemoteRejected` is only produced after the session has been
/// disconnected.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Slot index outside 1..=8.
    #[error("slot index {index} is out of range (expected 1..=8)")]
    OutOfRange { index: i64 },

    /// Field name that does not name a synchronizable field.
    #[error("unknown field: '{name}'")]
    UnknownField { name: String },

    /// Form index not present in the species' form table.
    #[error("form {form} is not valid for species {species} ({count} form(s))")]
    InvalidForm { species: u16, form: u8, count: u8 },

    /// Value outside the range a field accepts.
    #[error("invalid {field}: {value} ({expected})")]
    InvalidValue {
        field: FieldKind,
        value: i64,
        expected: &'static str,
    },

    /// Snapshot document missing fields or holding the wrong shapes.
    #[error("malformed snapshot: {message}")]
    MalformedSnapshot { message: String },

    /// The device did not confirm a compare-and-set write.
    #[error("device rejected write to {address}: {reason}")]
    RemoteRejected { address: Address, reason: String },

    /// Coordinate text that does not parse as a finite number.
    #[error("invalid {point} {axis} coordinate: '{text}'")]
    InvalidCoordinateInput {
        point: PointKind,
        axis: Axis,
        text: String,
    },

    /// Transport fault while talking to the device.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// A write was abandoned through its cancellation token.
    #[error("write to {address} was cancelled")]
    Cancelled { address: Address },

    /// Snapshot file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a transport error from any displayable cause.
    pub fn transport(message: impl std::fmt::Display) -> Self {
        Error::Transport {
            message: message.to_string(),
        }
    }

    /// Create a malformed-snapshot error from any displayable cause.
    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Error::MalformedSnapshot {
            message: message.to_string(),
        }
    }

    /// Whether this error ended the device session.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Error::RemoteRejected { .. })
    }
}
