use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::{RawTrack, RecognizerOutput};

/// Parse one track's recognizer JSON file. The speaker id is the file stem,
/// which in a multi-track session export names the recorded participant.
pub fn parse_recognizer_file(path: &Path) -> Result<RawTrack> {
    let speaker_id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Cannot derive a speaker id from file name: {:?}", path))?
        .to_string();

    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let output = parse_recognizer_json(&content)
        .with_context(|| format!("Failed to parse recognizer output: {:?}", path))?;

    Ok(RawTrack {
        speaker_id,
        segments: output.segments,
    })
}

/// Parse a recognizer JSON document
pub fn parse_recognizer_json(json: &str) -> Result<RecognizerOutput> {
    serde_json::from_str(json).context("Invalid recognizer JSON")
}

/// List the per-track recognizer files of a session directory, sorted by
/// file name so logs read the same way across runs. The merge itself does
/// not depend on this order.
pub fn session_track_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to read directory: {:?}", dir))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list directory: {:?}", dir))?
            .path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if path.is_file() && is_json {
            files.push(path);
        }
    }

    if files.is_empty() {
        anyhow::bail!("No recognizer output files (*.json) found in {:?}", dir);
    }

    files.sort();
    Ok(files)
}
