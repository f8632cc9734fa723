use thiserror::Error;

/// Track-level contract violations surfaced by the merge engine.
///
/// Per-segment problems never error - they are dropped and counted during
/// normalization. Only conditions that would break the cross-track tie-break
/// guarantee are reported, and always before any merged output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("duplicate speaker id across tracks: {speaker_id:?}")]
    DuplicateSpeakerId { speaker_id: String },

    #[error("track submitted with an empty speaker id")]
    EmptySpeakerId,
}
