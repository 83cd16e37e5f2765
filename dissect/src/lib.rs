//! Fragment reassembly and per-stream dissection for photon-dissect.
//!
//! This crate ties the envelope decoder (`wire`) and the parameter decoder
//! (`params`) together. [`FragmentBuffer`] reassembles reliable messages
//! split across fragment commands; [`Dissector`] runs a whole datagram
//! through envelope decoding, payload extraction, reassembly and parameter
//! decoding.
//!
//! # Design Principles
//!
//! - **Caller-owned state** - One [`Dissector`] per logical stream; nothing is global.
//! - **Order-independent reassembly** - Fragments concatenate by position, not arrival.
//! - **Bounded** - Incomplete messages are capped by [`ReassemblyLimits`].
//!
//! # Example
//!
//! ```
//! use dissect::{Fragment, FragmentBuffer, ReassemblyLimits};
//!
//! let mut buffer = FragmentBuffer::new(ReassemblyLimits::default());
//! let second = Fragment { sequence_number: 7, fragment_number: 1, fragment_count: 2, data: vec![0xFE] };
//! let first = Fragment { sequence_number: 7, fragment_number: 0, fragment_count: 2, data: vec![0xCA] };
//!
//! assert!(buffer.offer(second).is_none());
//! let message = buffer.offer(first).unwrap();
//! assert_eq!(message.data, [0xCA, 0xFE]);
//! ```

mod dissector;
mod error;
mod fragment;
mod limits;

pub use dissector::{DecodedMessage, Dissection, Dissector, DissectorConfig, RejectedCommand};
pub use error::{DissectError, DissectResult};
pub use fragment::{CompletedMessage, Fragment, FragmentBuffer, ReassemblyStats};
pub use limits::ReassemblyLimits;
