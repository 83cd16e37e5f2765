//! Reassembly of reliable messages split across several fragment commands.
//!
//! Fragments of one message share a sequence number and carry their 0-based
//! position and the total fragment count. The buffer collects them in any
//! arrival order and hands back the concatenated bytes once every position
//! has been seen.
//!
//! # Lifecycle
//!
//! 1. The first fragment for a sequence number creates an entry whose
//!    expected count is fixed by that fragment.
//! 2. Later fragments fill in positions; a repeated position overwrites the
//!    earlier bytes.
//! 3. When every position is filled the entry is removed and its data is
//!    returned in ascending position order.
//!
//! Entries that never complete are bounded by [`ReassemblyLimits`]: the
//! oldest entry is evicted when `max_pending` is reached, oversize entries
//! are dropped, and [`FragmentBuffer::evict_expired`] drops stale ones.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use tracing::{debug, warn};

use crate::limits::ReassemblyLimits;

/// One fragment offered to a [`FragmentBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub sequence_number: u32,
    /// 0-based position within the message.
    pub fragment_number: u32,
    pub fragment_count: u32,
    pub data: Vec<u8>,
}

impl From<wire::ReliableFragment<'_>> for Fragment {
    fn from(fragment: wire::ReliableFragment<'_>) -> Self {
        Self {
            sequence_number: fragment.sequence_number,
            fragment_number: fragment.fragment_number,
            fragment_count: fragment.fragment_count,
            data: fragment.data.to_vec(),
        }
    }
}

/// A fully reassembled message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedMessage {
    pub sequence_number: u32,
    pub data: Vec<u8>,
}

/// Running counters for a [`FragmentBuffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReassemblyStats {
    /// Messages returned complete.
    pub completed: u64,
    /// Incomplete messages dropped by a limit.
    pub evicted: u64,
    /// Fragments refused without being recorded.
    pub rejected: u64,
}

#[derive(Debug)]
struct Assembly {
    expected: u32,
    received: BTreeMap<u32, Vec<u8>>,
    bytes: usize,
    created_at: Instant,
}

impl Assembly {
    fn new(expected: u32, created_at: Instant) -> Self {
        Self {
            expected,
            received: BTreeMap::new(),
            bytes: 0,
            created_at,
        }
    }

    fn is_complete(&self) -> bool {
        usize::try_from(self.expected).is_ok_and(|expected| self.received.len() == expected)
    }

    fn bytes_with(&self, fragment: &Fragment) -> usize {
        let replaced = self
            .received
            .get(&fragment.fragment_number)
            .map_or(0, Vec::len);
        (self.bytes - replaced).saturating_add(fragment.data.len())
    }

    fn into_data(self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.bytes);
        for part in self.received.into_values() {
            data.extend_from_slice(&part);
        }
        data
    }
}

/// Collects fragments per sequence number until each message is complete.
///
/// One buffer belongs to one logical connection or stream; it holds no
/// shared state and callers serialize access to it.
#[derive(Debug, Default)]
pub struct FragmentBuffer {
    limits: ReassemblyLimits,
    assemblies: HashMap<u32, Assembly>,
    stats: ReassemblyStats,
}

impl FragmentBuffer {
    /// Creates an empty buffer with the given limits.
    #[must_use]
    pub fn new(limits: ReassemblyLimits) -> Self {
        Self {
            limits,
            assemblies: HashMap::new(),
            stats: ReassemblyStats::default(),
        }
    }

    /// Records a fragment, returning the message if it is now complete.
    ///
    /// The fragment count of the first fragment seen for a sequence number
    /// fixes the expected total. A fragment whose index is at or past that
    /// total, or whose count is zero, is rejected and never contributes to
    /// the message.
    pub fn offer(&mut self, fragment: Fragment) -> Option<CompletedMessage> {
        self.offer_at(fragment, Instant::now())
    }

    /// Records a fragment observed at `now`.
    ///
    /// `now` is used as the creation time when this fragment starts a new
    /// message; it is what [`evict_expired`](Self::evict_expired) and
    /// capacity eviction compare against.
    pub fn offer_at(&mut self, fragment: Fragment, now: Instant) -> Option<CompletedMessage> {
        let sequence_number = fragment.sequence_number;
        let expected = self
            .assemblies
            .get(&sequence_number)
            .map_or(fragment.fragment_count, |assembly| assembly.expected);
        if expected == 0 || fragment.fragment_number >= expected {
            warn!(
                sequence_number,
                fragment_number = fragment.fragment_number,
                fragment_count = fragment.fragment_count,
                expected,
                "rejected fragment outside message bounds"
            );
            self.stats.rejected += 1;
            return None;
        }

        let bytes = self
            .assemblies
            .get(&sequence_number)
            .map_or(fragment.data.len(), |assembly| assembly.bytes_with(&fragment));
        if bytes > self.limits.max_message_bytes {
            warn!(
                sequence_number,
                bytes,
                limit = self.limits.max_message_bytes,
                "dropped oversize message"
            );
            if self.assemblies.remove(&sequence_number).is_some() {
                self.stats.evicted += 1;
            }
            self.stats.rejected += 1;
            return None;
        }

        if !self.assemblies.contains_key(&sequence_number) {
            self.make_room();
            self.assemblies
                .insert(sequence_number, Assembly::new(expected, now));
        }
        let assembly = self.assemblies.get_mut(&sequence_number)?;
        assembly.bytes = bytes;
        assembly.received.insert(fragment.fragment_number, fragment.data);

        if !assembly.is_complete() {
            return None;
        }
        let assembly = self.assemblies.remove(&sequence_number)?;
        let data = assembly.into_data();
        debug!(
            sequence_number,
            fragments = expected,
            bytes = data.len(),
            "reassembled message"
        );
        self.stats.completed += 1;
        Some(CompletedMessage {
            sequence_number,
            data,
        })
    }

    /// Drops incomplete messages older than `max_age` at `now`.
    ///
    /// Returns the number of messages dropped.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let max_age = self.limits.max_age;
        let before = self.assemblies.len();
        self.assemblies.retain(|&sequence_number, assembly| {
            let keep = now.saturating_duration_since(assembly.created_at) <= max_age;
            if !keep {
                debug!(
                    sequence_number,
                    received = assembly.received.len(),
                    expected = assembly.expected,
                    "evicted stale message"
                );
            }
            keep
        });
        let evicted = before - self.assemblies.len();
        self.stats.evicted += u64::try_from(evicted).unwrap_or(u64::MAX);
        evicted
    }

    /// Number of incomplete messages currently held.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.assemblies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assemblies.is_empty()
    }

    /// Drops every incomplete message without counting it as evicted.
    pub fn clear(&mut self) {
        self.assemblies.clear();
    }

    #[must_use]
    pub fn stats(&self) -> ReassemblyStats {
        self.stats
    }

    #[must_use]
    pub fn limits(&self) -> &ReassemblyLimits {
        &self.limits
    }

    fn make_room(&mut self) {
        while self.assemblies.len() >= self.limits.max_pending {
            let Some(oldest) = self
                .assemblies
                .iter()
                .min_by_key(|(sequence_number, assembly)| (assembly.created_at, **sequence_number))
                .map(|(sequence_number, _)| *sequence_number)
            else {
                break;
            };
            debug!(sequence_number = oldest, "evicted oldest message at capacity");
            self.assemblies.remove(&oldest);
            self.stats.evicted += 1;
        }
    }
}
