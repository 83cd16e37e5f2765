//! Datagram header types and constants.

use bytestream::ByteReader;

/// Datagram header size in bytes (12 total).
pub const HEADER_SIZE: usize = 2 + 1 + 1 + 4 + 4;

/// Fixed datagram header.
///
/// Every field is read big-endian. `command_count` declares exactly how many
/// command envelopes follow the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PacketHeader {
    /// Peer identifier assigned by the server.
    pub peer_id: u16,
    /// Non-zero when the sender appended a CRC.
    pub crc_enabled: u8,
    /// Number of command envelopes in the datagram.
    pub command_count: u8,
    /// Sender timestamp.
    pub timestamp: u32,
    /// Connection challenge.
    pub challenge: i32,
}

impl PacketHeader {
    /// Returns `true` if the CRC flag is set.
    #[must_use]
    pub const fn has_crc(self) -> bool {
        self.crc_enabled != 0
    }

    /// Reads the header from the start of `reader`.
    ///
    /// Callers must have checked that at least [`HEADER_SIZE`] bytes remain.
    pub(crate) fn read(reader: &mut ByteReader<'_>) -> Option<Self> {
        Some(Self {
            peer_id: reader.read_u16().ok()?,
            crc_enabled: reader.read_u8().ok()?,
            command_count: reader.read_u8().ok()?,
            timestamp: reader.read_u32().ok()?,
            challenge: reader.read_i32().ok()?,
        })
    }
}
