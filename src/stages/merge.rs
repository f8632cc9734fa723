use std::collections::{BinaryHeap, HashSet};
use std::cmp::Reverse;

use tracing::info;

use crate::models::{MergeError, MergeStats, MergedEntry, MergedTranscript, NormalizedTrack};

/// Merge K normalized per-track segment lists into one globally time-ordered
/// sequence and tag transitive overlap groups.
///
/// A k-way merge over one cursor per track, O(total segments * log K). A flat
/// sort would not pin down the ordering of equal-start segments from
/// different tracks; here the tie-break is ascending `speaker_id`, which
/// makes the output byte-identical for any permutation of track submission
/// order.
///
/// Empty tracks contribute nothing and an all-empty session merges to an
/// empty transcript - neither is an error. The only reportable failures are
/// track-level contract violations (blank or duplicate speaker ids), raised
/// before any output is produced.
pub fn merge_tracks(tracks: &[NormalizedTrack]) -> Result<MergedTranscript, MergeError> {
    validate_speaker_ids(tracks)?;

    let mut speakers: Vec<String> = tracks.iter().map(|t| t.speaker_id.clone()).collect();
    speakers.sort();

    let mut stats = MergeStats {
        track_count: tracks.len(),
        ..Default::default()
    };
    for track in tracks {
        stats.dropped.accumulate(&track.dropped);
    }

    let total: usize = tracks.iter().map(|t| t.segments.len()).sum();
    let mut entries: Vec<MergedEntry> = Vec::with_capacity(total);

    // One cursor per track; the heap always holds each non-exhausted
    // track's next unconsumed segment, keyed by (start, speaker id).
    let mut cursors = vec![0usize; tracks.len()];
    let mut heap: BinaryHeap<Reverse<Cursor<'_>>> = BinaryHeap::with_capacity(tracks.len());

    for (track_index, track) in tracks.iter().enumerate() {
        if let Some(segment) = track.segments.first() {
            heap.push(Reverse(Cursor {
                start_ms: segment.start_ms,
                speaker_id: &track.speaker_id,
                track_index,
            }));
        }
    }

    while let Some(Reverse(cursor)) = heap.pop() {
        let track = &tracks[cursor.track_index];
        let segment = &track.segments[cursors[cursor.track_index]];

        entries.push(MergedEntry {
            segment: segment.clone(),
            overlap_group_id: 0,
        });

        cursors[cursor.track_index] += 1;
        if let Some(next) = track.segments.get(cursors[cursor.track_index]) {
            heap.push(Reverse(Cursor {
                start_ms: next.start_ms,
                speaker_id: &track.speaker_id,
                track_index: cursor.track_index,
            }));
        }
    }

    assign_overlap_groups(&mut entries);

    info!(
        tracks = tracks.len(),
        entries = entries.len(),
        dropped = stats.dropped.total(),
        "merged session"
    );

    Ok(MergedTranscript {
        entries,
        speakers,
        stats,
    })
}

/// Heap key for the next unconsumed segment of one track. The derived
/// ordering compares `start_ms` first, then `speaker_id` - exactly the
/// documented cross-track tie-break. Speaker ids are unique, so the track
/// index never decides.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Cursor<'a> {
    start_ms: u64,
    speaker_id: &'a str,
    track_index: usize,
}

fn validate_speaker_ids(tracks: &[NormalizedTrack]) -> Result<(), MergeError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(tracks.len());
    for track in tracks {
        if track.speaker_id.trim().is_empty() {
            return Err(MergeError::EmptySpeakerId);
        }
        if !seen.insert(&track.speaker_id) {
            return Err(MergeError::DuplicateSpeakerId {
                speaker_id: track.speaker_id.clone(),
            });
        }
    }
    Ok(())
}

/// Single sweep over the ordered entries: an entry joins the running group
/// while its half-open interval starts before the group's maximum end, which
/// computes the transitive closure of pairwise overlap in one pass.
/// Zero-width entries intersect nothing and always form a group of one.
fn assign_overlap_groups(entries: &mut [MergedEntry]) {
    let mut next_group: u64 = 0;
    // (group id, maximum end seen in the group)
    let mut open: Option<(u64, u64)> = None;

    for entry in entries.iter_mut() {
        let start = entry.segment.start_ms;
        let end = entry.segment.end_ms;

        if start == end {
            entry.overlap_group_id = next_group;
            next_group += 1;
            continue;
        }

        match open {
            Some((group_id, group_end)) if start < group_end => {
                entry.overlap_group_id = group_id;
                open = Some((group_id, group_end.max(end)));
            }
            _ => {
                entry.overlap_group_id = next_group;
                open = Some((next_group, end));
                next_group += 1;
            }
        }
    }
}
