//! Datagram decoding and command framing.

use bytestream::{ByteError, ByteReader};
use tracing::{debug, trace};

use crate::command::{Command, COMMAND_HEADER_SIZE};
use crate::error::{DecodeError, WireResult};
use crate::header::{PacketHeader, HEADER_SIZE};
use crate::limits::Limits;

/// A decoded datagram.
///
/// Commands borrow their payloads from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Packet<'a> {
    pub header: PacketHeader,
    /// Exactly `header.command_count` commands, in wire order.
    pub commands: Vec<Command<'a>>,
    /// Bytes following the last declared command, if any.
    pub trailing: &'a [u8],
}

/// Decodes a datagram into its header and command envelopes.
///
/// Decoding is all-or-nothing: any malformed envelope fails the whole
/// datagram and no partial command list is returned.
pub fn decode_packet<'a>(buf: &'a [u8], limits: &Limits) -> WireResult<Packet<'a>> {
    let result = decode_packet_inner(buf, limits);
    if let Err(err) = &result {
        debug!(len = buf.len(), %err, "rejected datagram");
    }
    result
}

fn decode_packet_inner<'a>(buf: &'a [u8], limits: &Limits) -> WireResult<Packet<'a>> {
    let too_small = DecodeError::PacketTooSmall {
        actual: buf.len(),
        required: HEADER_SIZE,
    };
    if buf.len() < HEADER_SIZE {
        return Err(too_small);
    }
    if buf.len() > limits.max_packet_bytes {
        return Err(DecodeError::PacketTooLarge {
            actual: buf.len(),
            limit: limits.max_packet_bytes,
        });
    }

    let mut reader = ByteReader::new(buf);
    let header = PacketHeader::read(&mut reader).ok_or(too_small)?;

    let mut commands = Vec::with_capacity(usize::from(header.command_count));
    for index in 0..usize::from(header.command_count) {
        let command = decode_command(&mut reader, index, header.command_count)?;
        trace!(
            index,
            command_type = command.command_type,
            channel = command.channel_id,
            length = command.length,
            "decoded command"
        );
        commands.push(command);
    }

    Ok(Packet {
        header,
        commands,
        trailing: reader.read_rest(),
    })
}

fn decode_command<'a>(
    reader: &mut ByteReader<'a>,
    index: usize,
    declared: u8,
) -> WireResult<Command<'a>> {
    let available = reader.remaining();
    let missing = |_: ByteError| DecodeError::MissingCommands {
        declared,
        decoded: index,
        available,
    };
    if available < COMMAND_HEADER_SIZE {
        return Err(DecodeError::MissingCommands {
            declared,
            decoded: index,
            available,
        });
    }

    let command_type = reader.read_u8().map_err(missing)?;
    let channel_id = reader.read_u8().map_err(missing)?;
    let flags = reader.read_u8().map_err(missing)?;
    let reserved_byte = reader.read_u8().map_err(missing)?;
    let length = reader.read_u32().map_err(missing)?;
    let reliable_sequence_number = reader.read_u32().map_err(missing)?;

    let truncated = DecodeError::CommandTruncated {
        index,
        declared: length,
        available,
    };
    let payload_len = usize::try_from(length)
        .map_err(|_| truncated.clone())?
        .checked_sub(COMMAND_HEADER_SIZE)
        .ok_or(DecodeError::CommandTooShort {
            index,
            length,
            minimum: COMMAND_HEADER_SIZE,
        })?;
    let payload = reader.read_bytes(payload_len).map_err(|_| truncated)?;

    Ok(Command {
        command_type,
        channel_id,
        flags,
        reserved_byte,
        length,
        reliable_sequence_number,
        payload,
    })
}
