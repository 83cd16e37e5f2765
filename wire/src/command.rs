//! Command envelopes.

/// Fixed command sub-header size in bytes (12 total).
///
/// A command's `length` field includes these bytes.
pub const COMMAND_HEADER_SIZE: usize = 1 + 1 + 1 + 1 + 4 + 4;

/// Known command types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CommandKind {
    Acknowledge,
    Connect,
    VerifyConnect,
    Disconnect,
    Ping,
    SendReliable,
    SendUnreliable,
    SendReliableFragment,
    /// A type byte outside the known table.
    Unknown(u8),
}

impl CommandKind {
    /// Resolves a raw command type byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Acknowledge,
            2 => Self::Connect,
            3 => Self::VerifyConnect,
            4 => Self::Disconnect,
            5 => Self::Ping,
            6 => Self::SendReliable,
            7 => Self::SendUnreliable,
            8 => Self::SendReliableFragment,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw command type byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Acknowledge => 1,
            Self::Connect => 2,
            Self::VerifyConnect => 3,
            Self::Disconnect => 4,
            Self::Ping => 5,
            Self::SendReliable => 6,
            Self::SendUnreliable => 7,
            Self::SendReliableFragment => 8,
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns `true` for kinds whose payload is a complete message.
    #[must_use]
    pub const fn carries_message(self) -> bool {
        matches!(self, Self::SendReliable | Self::SendUnreliable)
    }
}

/// A command envelope borrowed from a decoded datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Command<'a> {
    /// Raw command type byte; see [`Command::kind`].
    pub command_type: u8,
    pub channel_id: u8,
    pub flags: u8,
    pub reserved_byte: u8,
    /// Total envelope length, including the 12-byte sub-header.
    pub length: u32,
    pub reliable_sequence_number: u32,
    /// The `length - 12` bytes following the sub-header, uninterpreted.
    pub payload: &'a [u8],
}

impl Command<'_> {
    /// Resolves the command type byte against the known table.
    #[must_use]
    pub const fn kind(&self) -> CommandKind {
        CommandKind::from_raw(self.command_type)
    }
}
