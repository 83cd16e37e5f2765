//! Typed views over command payloads.
//!
//! A reliable message payload starts with a signature byte and a message
//! type, followed by type-specific codes, a parameter count and the
//! serialized parameters. Fragment payloads carry five `i32` fields ahead of
//! the fragment bytes. Nothing here interprets the parameter bytes.

use bytestream::ByteReader;

use crate::command::{Command, CommandKind};
use crate::error::{MessageError, MessageResult};

/// Size of the unreliable sequence number preceding unreliable messages.
pub const UNRELIABLE_PREFIX_SIZE: usize = 4;

/// Size of the fixed fragment header (five `i32` fields).
pub const FRAGMENT_HEADER_SIZE: usize = 5 * 4;

/// Message types above this value are encrypted.
const ENCRYPTED_THRESHOLD: u8 = 128;

/// Message-type-specific metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum MessageHeader {
    OperationRequest {
        operation_code: u8,
    },
    OperationResponse {
        operation_code: u8,
        return_code: i16,
        debug_byte: u8,
    },
    Event {
        event_code: u8,
    },
    /// A message type without type-specific fields.
    Other {
        message_type: u8,
    },
}

impl MessageHeader {
    const OPERATION_REQUEST: u8 = 2;
    const OPERATION_RESPONSE: u8 = 3;
    const EVENT: u8 = 4;
    const OPERATION_RESPONSE_ALT: u8 = 7;

    fn read(message_type: u8, reader: &mut ByteReader<'_>) -> MessageResult<Self> {
        let header = match message_type {
            Self::OPERATION_REQUEST => Self::OperationRequest {
                operation_code: reader.read_u8()?,
            },
            Self::OPERATION_RESPONSE | Self::OPERATION_RESPONSE_ALT => Self::OperationResponse {
                operation_code: reader.read_u8()?,
                return_code: reader.read_i16()?,
                debug_byte: reader.read_u8()?,
            },
            Self::EVENT => Self::Event {
                event_code: reader.read_u8()?,
            },
            other => Self::Other {
                message_type: other,
            },
        };
        Ok(header)
    }
}

/// A reliable message: metadata plus the serialized parameter buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReliableMessage<'a> {
    pub signature: u8,
    pub header: MessageHeader,
    /// Declared number of parameter entries in `data`.
    pub parameter_count: u16,
    /// Serialized parameter entries.
    pub data: &'a [u8],
}

impl<'a> ReliableMessage<'a> {
    /// Parses a reliable message from a complete message payload.
    ///
    /// Use this directly for reassembled fragment payloads.
    pub fn parse(payload: &'a [u8]) -> MessageResult<Self> {
        let mut reader = ByteReader::new(payload);
        let signature = reader.read_u8()?;
        let message_type = reader.read_u8()?;
        if message_type > ENCRYPTED_THRESHOLD {
            return Err(MessageError::Encrypted { message_type });
        }
        let header = MessageHeader::read(message_type, &mut reader)?;
        let parameter_count = reader.read_u16()?;
        Ok(Self {
            signature,
            header,
            parameter_count,
            data: reader.read_rest(),
        })
    }
}

/// One fragment of a reliable message split across several commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReliableFragment<'a> {
    /// Identifies the message being split; shared by all its fragments.
    pub sequence_number: u32,
    pub fragment_count: u32,
    /// 0-based position of this fragment.
    pub fragment_number: u32,
    pub total_length: u32,
    pub fragment_offset: u32,
    pub data: &'a [u8],
}

impl<'a> ReliableFragment<'a> {
    /// Parses a fragment from a `SendReliableFragment` payload.
    pub fn parse(payload: &'a [u8]) -> MessageResult<Self> {
        let mut reader = ByteReader::new(payload);
        let sequence_number = read_non_negative(&mut reader, "sequence_number")?;
        let fragment_count = read_non_negative(&mut reader, "fragment_count")?;
        let fragment_number = read_non_negative(&mut reader, "fragment_number")?;
        let total_length = read_non_negative(&mut reader, "total_length")?;
        let fragment_offset = read_non_negative(&mut reader, "fragment_offset")?;
        Ok(Self {
            sequence_number,
            fragment_count,
            fragment_number,
            total_length,
            fragment_offset,
            data: reader.read_rest(),
        })
    }
}

fn read_non_negative(reader: &mut ByteReader<'_>, field: &'static str) -> MessageResult<u32> {
    let value = reader.read_i32()?;
    u32::try_from(value).map_err(|_| MessageError::InvalidFragment { field, value })
}

impl<'a> Command<'a> {
    /// Extracts the reliable message carried by a `SendReliable` or
    /// `SendUnreliable` command.
    pub fn reliable_message(&self) -> MessageResult<ReliableMessage<'a>> {
        match self.kind() {
            CommandKind::SendReliable => ReliableMessage::parse(self.payload),
            CommandKind::SendUnreliable => {
                let mut reader = ByteReader::new(self.payload);
                reader.skip(UNRELIABLE_PREFIX_SIZE)?;
                ReliableMessage::parse(reader.read_rest())
            }
            _ => Err(MessageError::WrongKind {
                expected: CommandKind::SendReliable,
                found: self.command_type,
            }),
        }
    }

    /// Extracts the fragment carried by a `SendReliableFragment` command.
    pub fn reliable_fragment(&self) -> MessageResult<ReliableFragment<'a>> {
        if self.kind() != CommandKind::SendReliableFragment {
            return Err(MessageError::WrongKind {
                expected: CommandKind::SendReliableFragment,
                found: self.command_type,
            });
        }
        ReliableFragment::parse(self.payload)
    }
}
