//! Parameter type tags.

/// The type tags this decoder understands.
///
/// Tags are single ASCII bytes on the wire. Any other byte decodes to a
/// [`ValueError::UnknownType`](crate::ValueError::UnknownType).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum TypeTag {
    Int8 = b'b',
    Int16 = b'k',
    Int32 = b'i',
    Int64 = b'l',
    Float32 = b'f',
    String = b's',
    Boolean = b'o',
    Int8Sequence = b'x',
    GenericSequence = b'y',
}

impl TypeTag {
    /// All known tags.
    pub const ALL: [Self; 9] = [
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Float32,
        Self::String,
        Self::Boolean,
        Self::Int8Sequence,
        Self::GenericSequence,
    ];

    /// Parses a type tag from a raw byte.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            b'b' => Some(Self::Int8),
            b'k' => Some(Self::Int16),
            b'i' => Some(Self::Int32),
            b'l' => Some(Self::Int64),
            b'f' => Some(Self::Float32),
            b's' => Some(Self::String),
            b'o' => Some(Self::Boolean),
            b'x' => Some(Self::Int8Sequence),
            b'y' => Some(Self::GenericSequence),
            _ => None,
        }
    }

    /// Returns the raw tag byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self as u8
    }
}
