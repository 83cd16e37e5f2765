//! Bounded big-endian byte cursor for the photon-dissect decoders.
//!
//! This crate provides [`ByteReader`], a forward-only cursor over a borrowed
//! byte slice. It is designed for bounded, panic-free operation on untrusted
//! input with explicit error handling.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked against the remaining slice.
//! - **No domain knowledge** - This crate knows nothing about commands or parameters.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::ByteReader;
//!
//! let bytes = [0x00, 0x01, 0x00, 0x03, b'a', b'b', b'c'];
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u16().unwrap(), 1);
//! assert_eq!(reader.read_prefixed_u16().unwrap(), b"abc");
//! assert!(reader.is_empty());
//! ```

mod error;
mod reader;

pub use error::{ByteError, ByteResult};
pub use reader::ByteReader;
