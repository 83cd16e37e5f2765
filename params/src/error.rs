//! Error types for parameter decoding.

use bytestream::ByteError;
use thiserror::Error;

/// Result type for checked parameter decoding.
pub type ParamResult<T> = Result<T, ParamError>;

/// Errors reported by [`decode_parameters_checked`](crate::decode_parameters_checked).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParamError {
    /// The buffer ended before the declared number of entries was consumed.
    #[error("parameter buffer ended after {decoded} of {declared} entries")]
    Truncated { declared: u16, decoded: u16 },
}

/// Why a single value failed to decode.
///
/// Stored in-band as [`ParameterValue::Error`](crate::ParameterValue::Error);
/// its `Display` output is the diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValueError {
    /// The type tag is not one this decoder understands.
    #[error("unknown type tag {tag} (0x{tag:02X}) at offset {offset}")]
    UnknownType { tag: u8, offset: usize },

    /// A boolean byte other than `0x00` or `0x01`.
    #[error("invalid boolean byte 0x{byte:02X} at offset {offset}")]
    InvalidBoolean { byte: u8, offset: usize },

    /// The buffer ended inside the value.
    #[error("truncated value at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Sequences are nested deeper than the configured limit.
    #[error("sequence nesting exceeds {limit} levels at offset {offset}")]
    DepthExceeded { limit: usize, offset: usize },

    /// An element of a sequence failed; the whole sequence is discarded.
    ///
    /// `path` holds the element index at each nesting level, outermost
    /// first. `source` is never itself an `Element`.
    #[error("sequence element {}: {source}", display_path(.path))]
    Element {
        path: Vec<usize>,
        source: Box<ValueError>,
    },
}

impl ValueError {
    /// Returns `true` if the failure was running out of bytes, at any depth.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        matches!(self.root_cause(), Self::Truncated { .. })
    }

    /// Returns the innermost failure, skipping the sequence element wrapper.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Element { source, .. } => source,
            other => other,
        }
    }

    /// Wraps a failure of element `index` in the enclosing sequence.
    #[must_use]
    pub fn in_element(self, index: usize) -> Self {
        match self {
            Self::Element { mut path, source } => {
                path.insert(0, index);
                Self::Element { path, source }
            }
            other => Self::Element {
                path: vec![index],
                source: Box::new(other),
            },
        }
    }
}

fn display_path(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

impl From<ByteError> for ValueError {
    fn from(err: ByteError) -> Self {
        match err {
            ByteError::UnexpectedEof {
                offset,
                requested,
                available,
            } => Self::Truncated {
                offset,
                needed: requested,
                available,
            },
            ByteError::LengthOverflow { offset, value } => Self::Truncated {
                offset,
                needed: usize::try_from(value).unwrap_or(usize::MAX),
                available: 0,
            },
            other => Self::Truncated {
                offset: other.offset(),
                needed: 0,
                available: 0,
            },
        }
    }
}
