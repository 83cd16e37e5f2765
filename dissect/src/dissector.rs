//! Per-stream dissection of captured datagrams.
//!
//! A [`Dissector`] decodes each datagram's envelope, extracts the reliable
//! messages its commands carry, reassembles fragmented ones and decodes every
//! message's parameters. It is owned by the caller, one per logical stream,
//! since fragments of one message must reach the same reassembly buffer.

use std::time::Instant;

use params::{ParamLimits, Parameters};
use tracing::trace;
use wire::{
    Command, CommandKind, MessageError, MessageHeader, MessageResult, Packet, ReliableMessage,
};

use crate::error::DissectResult;
use crate::fragment::{Fragment, FragmentBuffer, ReassemblyStats};
use crate::limits::ReassemblyLimits;

/// Limits applied at every stage of dissection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DissectorConfig {
    pub wire: wire::Limits,
    pub params: ParamLimits,
    pub reassembly: ReassemblyLimits,
}

impl DissectorConfig {
    /// Creates a config suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            wire: wire::Limits::for_testing(),
            params: ParamLimits::for_testing(),
            reassembly: ReassemblyLimits::for_testing(),
        }
    }

    /// Creates a config with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            wire: wire::Limits::unlimited(),
            params: ParamLimits::unlimited(),
            reassembly: ReassemblyLimits::unlimited(),
        }
    }
}

/// A reliable message with its parameters decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMessage {
    /// Index of the command that carried (or completed) the message.
    pub command_index: usize,
    pub channel_id: u8,
    pub signature: u8,
    pub header: MessageHeader,
    pub parameters: Parameters,
    /// Fragment sequence number, when the message was reassembled.
    pub reassembled_from: Option<u32>,
}

/// A command whose payload could not be turned into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCommand {
    pub command_index: usize,
    pub error: MessageError,
}

/// Everything recovered from one datagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Dissection<'a> {
    /// The decoded envelope, including commands that carry no message.
    pub packet: Packet<'a>,
    /// Messages completed by this datagram, in command order.
    pub messages: Vec<DecodedMessage>,
    /// Per-command failures that did not abort the datagram.
    pub rejected: Vec<RejectedCommand>,
}

/// Stateful dissector for one logical stream.
#[derive(Debug, Default)]
pub struct Dissector {
    config: DissectorConfig,
    fragments: FragmentBuffer,
}

impl Dissector {
    #[must_use]
    pub fn new(config: DissectorConfig) -> Self {
        let fragments = FragmentBuffer::new(config.reassembly.clone());
        Self { config, fragments }
    }

    /// Dissects one datagram.
    ///
    /// Fails only if the envelope is malformed, in which case no fragment is
    /// offered and the reassembly state is unchanged.
    pub fn dissect<'a>(&mut self, datagram: &'a [u8]) -> DissectResult<Dissection<'a>> {
        self.dissect_at(datagram, Instant::now())
    }

    /// Dissects one datagram observed at `now`.
    ///
    /// Stale incomplete messages are evicted before this datagram's
    /// fragments are offered.
    pub fn dissect_at<'a>(
        &mut self,
        datagram: &'a [u8],
        now: Instant,
    ) -> DissectResult<Dissection<'a>> {
        let packet = wire::decode_packet(datagram, &self.config.wire)?;
        self.fragments.evict_expired(now);

        let mut messages = Vec::new();
        let mut rejected = Vec::new();
        for (command_index, command) in packet.commands.iter().enumerate() {
            let outcome = match command.kind() {
                CommandKind::SendReliable | CommandKind::SendUnreliable => {
                    command.reliable_message().map(|message| {
                        Some(decode(
                            command_index,
                            command.channel_id,
                            &message,
                            None,
                            &self.config.params,
                        ))
                    })
                }
                CommandKind::SendReliableFragment => {
                    self.reassemble(command_index, command, now)
                }
                _ => Ok(None),
            };
            match outcome {
                Ok(Some(message)) => messages.push(message),
                Ok(None) => {}
                Err(error) => {
                    trace!(command_index, %error, "rejected command payload");
                    rejected.push(RejectedCommand {
                        command_index,
                        error,
                    });
                }
            }
        }

        Ok(Dissection {
            packet,
            messages,
            rejected,
        })
    }

    /// Reassembly state for this stream.
    #[must_use]
    pub fn fragments(&self) -> &FragmentBuffer {
        &self.fragments
    }

    #[must_use]
    pub fn stats(&self) -> ReassemblyStats {
        self.fragments.stats()
    }

    #[must_use]
    pub fn config(&self) -> &DissectorConfig {
        &self.config
    }

    fn reassemble(
        &mut self,
        command_index: usize,
        command: &Command<'_>,
        now: Instant,
    ) -> MessageResult<Option<DecodedMessage>> {
        let fragment = command.reliable_fragment()?;
        let Some(completed) = self.fragments.offer_at(Fragment::from(fragment), now) else {
            return Ok(None);
        };
        let message = ReliableMessage::parse(&completed.data)?;
        Ok(Some(decode(
            command_index,
            command.channel_id,
            &message,
            Some(completed.sequence_number),
            &self.config.params,
        )))
    }
}

fn decode(
    command_index: usize,
    channel_id: u8,
    message: &ReliableMessage<'_>,
    reassembled_from: Option<u32>,
    limits: &ParamLimits,
) -> DecodedMessage {
    let parameters = params::decode_message(message, limits);
    trace!(
        command_index,
        channel_id,
        header = ?message.header,
        parameters = parameters.len(),
        "decoded message"
    );
    DecodedMessage {
        command_index,
        channel_id,
        signature: message.signature,
        header: message.header,
        parameters,
        reassembled_from,
    }
}
