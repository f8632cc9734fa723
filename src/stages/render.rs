use std::collections::HashMap;

use crate::models::MergedTranscript;

/// Configuration for transcript rendering
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Display names by speaker id; unmapped speakers fall back to the raw id
    pub labels: HashMap<String, String>,
    /// Omit the end timestamp from each line
    pub start_only: bool,
}

impl RenderConfig {
    pub fn with_labels(labels: HashMap<String, String>) -> Self {
        Self {
            labels,
            start_only: false,
        }
    }
}

/// Render the merged sequence as human/LLM-readable text, one line per entry.
///
/// Entries whose overlap group has more than one member are prefixed with a
/// `| ` marker so a reader can see simultaneous speech was collapsed into
/// sequential lines. A pure projection: every entry appears exactly once, in
/// merge order.
pub fn render_transcript(transcript: &MergedTranscript, config: &RenderConfig) -> String {
    let group_sizes = transcript.group_sizes();
    let mut output = String::new();

    for entry in &transcript.entries {
        let segment = &entry.segment;
        let grouped = group_sizes
            .get(&entry.overlap_group_id)
            .copied()
            .unwrap_or(0)
            > 1;

        if grouped {
            output.push_str("| ");
        }

        if config.start_only {
            output.push_str(&format!("[{}]", format_timestamp(segment.start_ms)));
        } else {
            output.push_str(&format!(
                "[{} - {}]",
                format_timestamp(segment.start_ms),
                format_timestamp(segment.end_ms)
            ));
        }

        let label = config
            .labels
            .get(&segment.speaker_id)
            .map(String::as_str)
            .unwrap_or(segment.speaker_id.as_str());

        output.push_str(&format!(" {}: {}\n", label, segment.text));
    }

    output
}

/// Format milliseconds as MM:SS.mmm
pub fn format_timestamp(ms: u64) -> String {
    let seconds = ms / 1000;
    let millis = ms % 1000;
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}.{:03}", minutes, secs, millis)
}
