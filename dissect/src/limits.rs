//! Limits for fragment reassembly.

use std::time::Duration;

/// Bounds on the state a [`FragmentBuffer`](crate::FragmentBuffer) keeps for
/// incomplete messages.
///
/// Completed messages are unaffected by these limits unless they exceed
/// `max_message_bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassemblyLimits {
    /// Maximum number of incomplete messages held at once. The oldest is
    /// evicted to make room for a new one.
    pub max_pending: usize,
    /// Maximum accumulated size of one message across its fragments.
    pub max_message_bytes: usize,
    /// Age after which an incomplete message is dropped by
    /// [`FragmentBuffer::evict_expired`](crate::FragmentBuffer::evict_expired).
    pub max_age: Duration,
}

impl Default for ReassemblyLimits {
    fn default() -> Self {
        Self {
            max_pending: 64,
            max_message_bytes: 1024 * 1024,
            max_age: Duration::from_secs(10),
        }
    }
}

impl ReassemblyLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_pending: 4,
            max_message_bytes: 1024,
            max_age: Duration::from_secs(1),
        }
    }

    /// Creates limits with no restrictions (use with caution).
    ///
    /// Sequence numbers that never complete are then kept forever.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_pending: usize::MAX,
            max_message_bytes: usize::MAX,
            max_age: Duration::MAX,
        }
    }
}
