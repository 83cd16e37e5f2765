//! Datagram header and command envelope decoding for photon-dissect.
//!
//! This crate handles the binary wire format: the fixed datagram header, the
//! command envelopes that follow it, and typed views over command payloads
//! (reliable messages and fragments). It does not decode parameter values.
//!
//! # Design Principles
//!
//! - **Bit-exact layout** - All integers are big-endian; every field is kept as read.
//! - **All-or-nothing framing** - A malformed envelope fails the whole datagram.
//! - **Zero copy** - Payloads borrow from the input buffer.
//! - **No protocol semantics** - Operation and event codes are carried, never interpreted.
//!
//! # Example
//!
//! ```
//! use wire::{decode_packet, CommandKind, Limits};
//!
//! let datagram = [
//!     0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
//!     0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00, 0x00,
//! ];
//! let packet = decode_packet(&datagram, &Limits::default()).unwrap();
//! assert_eq!(packet.commands.len(), 1);
//! assert_eq!(packet.commands[0].kind(), CommandKind::Ping);
//! ```

mod command;
mod error;
mod header;
mod limits;
mod message;
mod packet;

pub use command::{Command, CommandKind, COMMAND_HEADER_SIZE};
pub use error::{DecodeError, MessageError, MessageResult, WireResult};
pub use header::{PacketHeader, HEADER_SIZE};
pub use limits::Limits;
pub use message::{
    MessageHeader, ReliableFragment, ReliableMessage, FRAGMENT_HEADER_SIZE,
    UNRELIABLE_PREFIX_SIZE,
};
pub use packet::{decode_packet, Packet};
