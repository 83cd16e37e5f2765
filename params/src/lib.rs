//! Type-tagged parameter value decoding for photon-dissect.
//!
//! Reliable messages carry their parameters as a flat list of
//! `key | type tag | payload` entries. This crate turns that buffer into a
//! map from parameter code to [`ParameterValue`].
//!
//! # Features
//!
//! - Fixed-width integers, floats, strings and booleans
//! - Signed byte sequences and recursively nested generic sequences
//! - In-band [`ValueError`]s for unknown tags and malformed values
//! - Optional truncation reporting via [`decode_parameters_checked`]
//!
//! # Design Principles
//!
//! - **Never abort on one bad value** - Unknown or malformed values are recorded
//!   per key; sibling parameters still decode.
//! - **Deterministic** - Same inputs produce same outputs, in the same order.
//! - **Bounded** - Allocation is bounded by the input size and nesting by [`ParamLimits`].

mod decode;
mod error;
mod limits;
mod tag;
mod value;

pub use decode::{decode_message, decode_parameters, decode_parameters_checked};
pub use error::{ParamError, ParamResult, ValueError};
pub use limits::ParamLimits;
pub use tag::TypeTag;
pub use value::{ParameterValue, Parameters};
