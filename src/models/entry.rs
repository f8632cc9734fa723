use std::collections::HashMap;

use super::{DropCounts, Segment};

/// One segment in the merged sequence, tagged with its overlap group
#[derive(Debug, Clone, PartialEq)]
pub struct MergedEntry {
    pub segment: Segment,
    /// Entries sharing a group id are mutually temporally overlapping with
    /// at least one other member of the group (transitive closure). An
    /// entry overlapping nothing gets a group of its own.
    pub overlap_group_id: u64,
}

/// The complete merged session: globally time-ordered entries from all tracks
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTranscript {
    /// Entries ascending by `(start_ms, speaker_id)`
    pub entries: Vec<MergedEntry>,
    /// Speaker ids of all submitted tracks, sorted
    pub speakers: Vec<String>,
    /// Aggregate statistics from normalization and merging
    pub stats: MergeStats,
}

/// Aggregate statistics for one merge operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Number of tracks submitted (empty tracks included)
    pub track_count: usize,
    /// Segments discarded during normalization, summed over all tracks
    pub dropped: DropCounts,
}

impl MergedTranscript {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Session duration in milliseconds, from the earliest start to the
    /// latest end across all entries
    pub fn duration_ms(&self) -> u64 {
        let first_start = self.entries.first().map(|e| e.segment.start_ms).unwrap_or(0);
        let last_end = self
            .entries
            .iter()
            .map(|e| e.segment.end_ms)
            .max()
            .unwrap_or(0);
        last_end.saturating_sub(first_start)
    }

    /// Number of entries in each overlap group
    pub fn group_sizes(&self) -> HashMap<u64, usize> {
        let mut sizes = HashMap::new();
        for entry in &self.entries {
            *sizes.entry(entry.overlap_group_id).or_insert(0) += 1;
        }
        sizes
    }

    /// Entries that share their overlap group with at least one other entry
    pub fn overlapping_entry_count(&self) -> usize {
        let sizes = self.group_sizes();
        self.entries
            .iter()
            .filter(|e| sizes.get(&e.overlap_group_id).copied().unwrap_or(0) > 1)
            .count()
    }
}
