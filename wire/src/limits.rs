//! Configurable limits for bounded decoding.

/// Wire-level limits for datagram decoding.
///
/// Command envelopes are already bounded by the datagram itself; the only
/// knob here is the size of the datagram accepted in the first place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum datagram size in bytes.
    pub max_packet_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Larger than any UDP payload
            max_packet_bytes: 64 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_packet_bytes: 4096,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_packet_bytes: usize::MAX,
        }
    }
}
