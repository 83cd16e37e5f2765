//! Decoded parameter values.

use std::collections::BTreeMap;

use crate::error::ValueError;
use crate::tag::TypeTag;

/// Decoded parameters keyed by numeric parameter code.
///
/// Ordered so that identical input always iterates identically.
pub type Parameters = BTreeMap<u8, ParameterValue>;

/// A single decoded parameter value.
///
/// `Error` is a first-class variant: a value that failed to decode never
/// shows up as a `String`.
///
/// Dropping a value is iterative however deep its sequences nest. The
/// derived `Clone`, `PartialEq` and `Debug` impls recurse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParameterValue {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    /// Raw text bytes; not validated as UTF-8.
    String(Vec<u8>),
    Boolean(bool),
    Int8Sequence(Vec<i8>),
    /// Homogeneous sequence; every item was encoded as a bare `element_type` payload.
    GenericSequence {
        element_type: TypeTag,
        items: Vec<ParameterValue>,
    },
    Error(#[cfg_attr(feature = "serde", serde(serialize_with = "serialize_display"))] ValueError),
}

impl ParameterValue {
    /// Returns the wire tag this value was decoded from, or `None` for errors.
    #[must_use]
    pub const fn type_tag(&self) -> Option<TypeTag> {
        let tag = match self {
            Self::Int8(_) => TypeTag::Int8,
            Self::Int16(_) => TypeTag::Int16,
            Self::Int32(_) => TypeTag::Int32,
            Self::Int64(_) => TypeTag::Int64,
            Self::Float32(_) => TypeTag::Float32,
            Self::String(_) => TypeTag::String,
            Self::Boolean(_) => TypeTag::Boolean,
            Self::Int8Sequence(_) => TypeTag::Int8Sequence,
            Self::GenericSequence { .. } => TypeTag::GenericSequence,
            Self::Error(_) => return None,
        };
        Some(tag)
    }

    /// Returns `true` if this value failed to decode.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the decode failure, if any.
    #[must_use]
    pub const fn as_error(&self) -> Option<&ValueError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Returns a `String` value as text if it is valid UTF-8.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

impl Drop for ParameterValue {
    fn drop(&mut self) {
        let Self::GenericSequence { items, .. } = self else {
            return;
        };
        if !items.iter().any(|item| matches!(item, Self::GenericSequence { .. })) {
            return;
        }
        let mut pending = std::mem::take(items);
        while let Some(mut value) = pending.pop() {
            if let Self::GenericSequence { items, .. } = &mut value {
                pending.append(items);
            }
        }
    }
}

#[cfg(feature = "serde")]
fn serialize_display<S>(value: &ValueError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(value)
}
