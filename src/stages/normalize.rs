use std::cmp::Ordering;

use tracing::debug;

use crate::models::{DropCounts, NormalizedTrack, RawSegment, Segment};

/// Clean one track's raw recognizer output into a sorted, non-overlapping
/// segment list.
///
/// Malformed segments never fail the track - they are dropped and counted:
/// - non-finite or `end < start` timestamps
/// - whitespace-only text after trimming
/// - losers of intra-track overlap resolution (higher confidence wins,
///   ties prefer the longer duration, then the earlier start)
///
/// A negative start with a valid end is clamped to zero rather than dropped.
/// Pure function of its input; normalizing an already-normalized track's
/// segments returns them unchanged.
pub fn normalize_track(speaker_id: &str, raw: &[RawSegment]) -> NormalizedTrack {
    let mut dropped = DropCounts::default();
    let mut segments: Vec<Segment> = Vec::with_capacity(raw.len());

    for raw_segment in raw {
        match clean_segment(speaker_id, raw_segment) {
            Ok(segment) => segments.push(segment),
            Err(reason) => match reason {
                DropReason::Malformed => dropped.malformed += 1,
                DropReason::EmptyText => dropped.empty_text += 1,
            },
        }
    }

    // Stable sort keeps the original relative order for equal starts
    segments.sort_by_key(|s| s.start_ms);

    let segments = resolve_intra_track_overlaps(segments, &mut dropped);

    if dropped.total() > 0 {
        debug!(
            speaker_id,
            malformed = dropped.malformed,
            empty_text = dropped.empty_text,
            intra_track_overlap = dropped.intra_track_overlap,
            "dropped segments during normalization"
        );
    }

    NormalizedTrack {
        speaker_id: speaker_id.to_string(),
        segments,
        dropped,
    }
}

enum DropReason {
    Malformed,
    EmptyText,
}

fn clean_segment(speaker_id: &str, raw: &RawSegment) -> Result<Segment, DropReason> {
    if !raw.start.is_finite() || !raw.end.is_finite() {
        return Err(DropReason::Malformed);
    }

    let start = raw.start.max(0.0);
    let end = raw.end;
    if end < start {
        return Err(DropReason::Malformed);
    }

    let text = raw.text.trim();
    if text.is_empty() {
        return Err(DropReason::EmptyText);
    }

    Ok(Segment {
        speaker_id: speaker_id.to_string(),
        start_ms: (start * 1000.0) as u64,
        end_ms: (end * 1000.0) as u64,
        text: text.to_string(),
        confidence: raw
            .confidence
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0)),
    })
}

/// Resolve overlaps within one track by dropping the losing segment
/// entirely. Truncating would fabricate boundaries the recognizer never
/// produced. Input must be sorted by start.
fn resolve_intra_track_overlaps(segments: Vec<Segment>, dropped: &mut DropCounts) -> Vec<Segment> {
    let mut kept: Vec<Segment> = Vec::with_capacity(segments.len());

    for candidate in segments {
        match kept.last() {
            Some(last) if last.overlaps(&candidate) => {
                if challenger_wins(last, &candidate) {
                    // candidate.start >= last.start, and the previous kept
                    // segment ends at or before last.start, so swapping in
                    // the candidate cannot introduce a new overlap
                    kept.pop();
                    kept.push(candidate);
                }
                dropped.intra_track_overlap += 1;
            }
            _ => kept.push(candidate),
        }
    }

    kept
}

/// Decide whether `challenger` replaces `incumbent` when the two overlap.
/// `incumbent` precedes `challenger` in sorted order.
fn challenger_wins(incumbent: &Segment, challenger: &Segment) -> bool {
    // Absent confidence ranks below any reported score
    let incumbent_conf = incumbent.confidence.unwrap_or(-1.0);
    let challenger_conf = challenger.confidence.unwrap_or(-1.0);

    match challenger_conf.partial_cmp(&incumbent_conf).unwrap_or(Ordering::Equal) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match challenger.duration_ms().cmp(&incumbent.duration_ms()) {
            Ordering::Greater => true,
            // Equal confidence and duration: the earlier start wins, and the
            // incumbent never starts later than the challenger
            _ => false,
        },
    }
}
