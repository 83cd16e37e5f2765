//! Limits for parameter decoding.

/// Parameter-level limits enforced during decoding.
///
/// Sequence lengths are bounded by the bytes actually present. Nesting is
/// decoded without recursion, so the default puts no bound on it; a caller
/// may opt into a depth cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamLimits {
    /// Maximum nesting depth of generic sequences. Deeper input becomes a
    /// `DepthExceeded` value error.
    pub max_depth: usize,
}

impl Default for ParamLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl ParamLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self { max_depth: 8 }
    }

    /// Creates limits with no restrictions.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}
