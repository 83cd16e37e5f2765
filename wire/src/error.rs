//! Error types for wire format operations.

use bytestream::ByteError;
use thiserror::Error;

use crate::command::CommandKind;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, DecodeError>;

/// Result type for command payload extraction.
pub type MessageResult<T> = Result<T, MessageError>;

/// Structural decode errors for a datagram.
///
/// Any of these invalidates the whole datagram: once an envelope length
/// cannot be trusted, neither can the offset of any envelope after it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// Datagram is too small to contain the fixed header.
    #[error("packet too small: {actual} bytes, need at least {required}")]
    PacketTooSmall { actual: usize, required: usize },

    /// Datagram exceeds the configured size limit.
    #[error("packet too large: {actual} bytes exceeds limit of {limit}")]
    PacketTooLarge { actual: usize, limit: usize },

    /// The datagram ended before all declared command envelopes were read.
    #[error(
        "missing commands: header declares {declared}, decoded {decoded} before running out of bytes ({available} left)"
    )]
    MissingCommands {
        declared: u8,
        decoded: usize,
        available: usize,
    },

    /// A command's length field is smaller than its own fixed header.
    #[error("command {index} declares length {length}, below the {minimum}-byte command header")]
    CommandTooShort {
        index: usize,
        length: u32,
        minimum: usize,
    },

    /// A command's length field runs past the end of the datagram.
    #[error("command {index} declares {declared} bytes but only {available} remain")]
    CommandTruncated {
        index: usize,
        declared: u32,
        available: usize,
    },
}

/// Errors that can occur while extracting a typed payload from a command.
///
/// These are per-command and never invalidate the surrounding datagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MessageError {
    /// The command kind does not carry the requested payload.
    #[error("command type {found} cannot be read as {expected:?}")]
    WrongKind { expected: CommandKind, found: u8 },

    /// The message is encrypted and cannot be decoded passively.
    #[error("message type 0x{message_type:02X} is encrypted")]
    Encrypted { message_type: u8 },

    /// A fragment header field is negative.
    #[error("fragment field {field} has invalid value {value}")]
    InvalidFragment { field: &'static str, value: i32 },

    /// The payload ended inside a fixed field.
    #[error("truncated payload: {0}")]
    Truncated(#[from] ByteError),
}
