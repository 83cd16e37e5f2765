//! Error types for byte cursor operations.

use thiserror::Error;

/// Result type for byte cursor operations.
pub type ByteResult<T> = Result<T, ByteError>;

/// Errors that can occur while reading from a [`ByteReader`](crate::ByteReader).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ByteError {
    /// Attempted to read past the end of the buffer.
    #[error("unexpected end of data at offset {offset}: need {requested} bytes, have {available}")]
    UnexpectedEof {
        /// Cursor position when the read was attempted.
        offset: usize,
        /// Number of bytes requested.
        requested: usize,
        /// Number of bytes left in the buffer.
        available: usize,
    },

    /// A length prefix does not fit in the platform's address space.
    #[error("length {value} at offset {offset} does not fit in memory")]
    LengthOverflow {
        /// Cursor position of the length prefix.
        offset: usize,
        /// The decoded length value.
        value: u64,
    },
}

impl ByteError {
    /// Returns the cursor position at which the error occurred.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match self {
            Self::UnexpectedEof { offset, .. } | Self::LengthOverflow { offset, .. } => *offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unexpected_eof() {
        let err = ByteError::UnexpectedEof {
            offset: 12,
            requested: 4,
            available: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 12"), "should mention the offset");
        assert!(msg.contains("need 4"), "should mention requested bytes");
        assert!(msg.contains("have 1"), "should mention available bytes");
    }

    #[test]
    fn error_display_length_overflow() {
        let err = ByteError::LengthOverflow {
            offset: 3,
            value: u64::MAX,
        };
        let msg = err.to_string();
        assert!(msg.contains(&u64::MAX.to_string()));
    }

    #[test]
    fn error_offset_accessor() {
        let err = ByteError::UnexpectedEof {
            offset: 7,
            requested: 1,
            available: 0,
        };
        assert_eq!(err.offset(), 7);
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<ByteError>();
    }
}
