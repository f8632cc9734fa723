pub mod io;
pub mod llm;
pub mod models;
pub mod stages;

pub use io::{
    parse_recognizer_file, session_track_files, write_text_artifact, MergedDocument, RunMetadata,
};
pub use llm::{DeepSeekClient, DeepSeekConfig};
pub use models::{
    DropCounts, MergeError, MergeStats, MergedEntry, MergedTranscript, NormalizedTrack,
    RawSegment, RawTrack, RecognizerOutput, Segment,
};
pub use stages::{merge_tracks, normalize_track, render_transcript, RenderConfig};
