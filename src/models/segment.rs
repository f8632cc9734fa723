use serde::{Deserialize, Serialize};

/// A normalized utterance belonging to one speaker track, with millisecond timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Identifier of the owning track, unique within one merge call
    pub speaker_id: String,
    /// Start offset from session start in milliseconds
    pub start_ms: u64,
    /// End offset in milliseconds, always >= start_ms
    pub end_ms: u64,
    /// Recognized text - trimmed, never empty after normalization
    pub text: String,
    /// Recognizer confidence (0-1), absent if the engine does not emit one
    pub confidence: Option<f64>,
}

impl Segment {
    /// Duration of this segment in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Half-open interval intersection: `[start, end)` ranges that merely
    /// touch do not overlap, and a zero-width segment overlaps nothing.
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start_ms < self.end_ms
            && other.start_ms < other.end_ms
            && self.start_ms < other.end_ms
            && other.start_ms < self.end_ms
    }
}

/// One speaker's cleaned segment list, ready for merging
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTrack {
    /// Identifier of the track, unique within one merge call
    pub speaker_id: String,
    /// Segments sorted ascending by start, mutually non-overlapping
    pub segments: Vec<Segment>,
    /// How many raw segments were discarded, by reason
    pub dropped: DropCounts,
}

/// Diagnostic counts of segments discarded during normalization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DropCounts {
    /// `end < start`, negative or non-finite timestamps
    pub malformed: usize,
    /// Whitespace-only text after trimming
    pub empty_text: usize,
    /// Lost an intra-track overlap resolution
    pub intra_track_overlap: usize,
}

impl DropCounts {
    /// Total number of discarded segments
    pub fn total(&self) -> usize {
        self.malformed + self.empty_text + self.intra_track_overlap
    }

    /// Fold another track's counts into this one
    pub fn accumulate(&mut self, other: &DropCounts) {
        self.malformed += other.malformed;
        self.empty_text += other.empty_text;
        self.intra_track_overlap += other.intra_track_overlap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start_ms: u64, end_ms: u64) -> Segment {
        Segment {
            speaker_id: "a".to_string(),
            start_ms,
            end_ms,
            text: "hi".to_string(),
            confidence: None,
        }
    }

    #[test]
    fn test_overlaps_half_open() {
        // [0, 2000) and [1000, 3000) intersect
        assert!(seg(0, 2000).overlaps(&seg(1000, 3000)));
        assert!(seg(1000, 3000).overlaps(&seg(0, 2000)));

        // Touching intervals do not overlap
        assert!(!seg(0, 1000).overlaps(&seg(1000, 2000)));
        assert!(!seg(1000, 2000).overlaps(&seg(0, 1000)));
    }

    #[test]
    fn test_zero_width_overlaps_nothing() {
        assert!(!seg(500, 500).overlaps(&seg(0, 1000)));
        assert!(!seg(0, 1000).overlaps(&seg(500, 500)));
        assert!(!seg(500, 500).overlaps(&seg(500, 500)));
    }

    #[test]
    fn test_duration() {
        assert_eq!(seg(100, 350).duration_ms(), 250);
        assert_eq!(seg(100, 100).duration_ms(), 0);
    }

    #[test]
    fn test_drop_counts_accumulate() {
        let mut total = DropCounts::default();
        total.accumulate(&DropCounts {
            malformed: 1,
            empty_text: 2,
            intra_track_overlap: 0,
        });
        total.accumulate(&DropCounts {
            malformed: 0,
            empty_text: 1,
            intra_track_overlap: 3,
        });
        assert_eq!(total.malformed, 1);
        assert_eq!(total.empty_text, 3);
        assert_eq!(total.intra_track_overlap, 3);
        assert_eq!(total.total(), 7);
    }
}
