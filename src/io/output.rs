use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{DropCounts, MergedTranscript};

/// Machine-readable merged transcript document
#[derive(Debug, Clone, Serialize)]
pub struct MergedDocument {
    /// Unique id for this merge run
    pub session_id: String,
    /// When the document was generated (UTC)
    pub generated_at: DateTime<Utc>,
    /// Speaker ids of all submitted tracks, sorted
    pub speakers: Vec<String>,
    /// Entries in merge order
    pub entries: Vec<DocumentEntry>,
    pub metadata: RunMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentEntry {
    pub speaker_id: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub overlap_group_id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    pub track_count: usize,
    pub entry_count: usize,
    pub overlapping_entries: usize,
    pub segments_dropped: DropCounts,
    pub duration_ms: u64,
}

impl MergedDocument {
    /// Snapshot a merged transcript for serialization
    pub fn from_transcript(transcript: &MergedTranscript) -> Self {
        let entries: Vec<DocumentEntry> = transcript
            .entries
            .iter()
            .map(|entry| DocumentEntry {
                speaker_id: entry.segment.speaker_id.clone(),
                start_ms: entry.segment.start_ms,
                end_ms: entry.segment.end_ms,
                text: entry.segment.text.clone(),
                confidence: entry.segment.confidence,
                overlap_group_id: entry.overlap_group_id,
            })
            .collect();

        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            speakers: transcript.speakers.clone(),
            entries,
            metadata: RunMetadata {
                track_count: transcript.stats.track_count,
                entry_count: transcript.len(),
                overlapping_entries: transcript.overlapping_entry_count(),
                segments_dropped: transcript.stats.dropped,
                duration_ms: transcript.duration_ms(),
            },
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Write a text artifact (rendered transcript or summary) to a file
pub fn write_text_artifact(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DropCounts, NormalizedTrack, Segment};
    use crate::stages::merge_tracks;

    fn transcript() -> MergedTranscript {
        let tracks = vec![
            NormalizedTrack {
                speaker_id: "alice".to_string(),
                segments: vec![Segment {
                    speaker_id: "alice".to_string(),
                    start_ms: 0,
                    end_ms: 2000,
                    text: "hi".to_string(),
                    confidence: Some(0.9),
                }],
                dropped: DropCounts {
                    malformed: 1,
                    ..Default::default()
                },
            },
            NormalizedTrack {
                speaker_id: "bob".to_string(),
                segments: vec![Segment {
                    speaker_id: "bob".to_string(),
                    start_ms: 1000,
                    end_ms: 3000,
                    text: "hey".to_string(),
                    confidence: None,
                }],
                dropped: DropCounts::default(),
            },
        ];
        merge_tracks(&tracks).unwrap()
    }

    #[test]
    fn test_document_mirrors_transcript() {
        let merged = transcript();
        let document = MergedDocument::from_transcript(&merged);

        assert_eq!(document.entries.len(), merged.len());
        assert_eq!(document.speakers, vec!["alice", "bob"]);
        assert_eq!(document.metadata.track_count, 2);
        assert_eq!(document.metadata.entry_count, 2);
        assert_eq!(document.metadata.overlapping_entries, 2);
        assert_eq!(document.metadata.segments_dropped.malformed, 1);
        assert_eq!(document.metadata.duration_ms, 3000);
    }

    #[test]
    fn test_confidence_omitted_when_absent() {
        let document = MergedDocument::from_transcript(&transcript());
        let json = serde_json::to_string(&document).unwrap();

        assert!(json.contains(r#""confidence":0.9"#));
        // bob's entry has no confidence field at all
        let bob = json.find(r#""speaker_id":"bob""#).unwrap();
        assert!(!json[bob..].contains("confidence"));
    }

    #[test]
    fn test_write_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merged.json");

        let document = MergedDocument::from_transcript(&transcript());
        document.write_json(&path).unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["entries"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["metadata"]["entry_count"], 2);
    }

    #[test]
    fn test_write_text_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.txt");

        write_text_artifact(&path, "[00:00.000] alice: hi\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[00:00.000] alice: hi\n"
        );
    }
}
