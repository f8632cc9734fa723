use serde::{Deserialize, Serialize};

/// Root document emitted by the speech-to-text engine for one audio track
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognizerOutput {
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

/// A single recognized span as the engine emitted it, seconds-based
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSegment {
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
    /// The recognized text
    pub text: String,
    /// Recognition confidence (0-1), not emitted by every engine
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// One track's raw recognizer output paired with its speaker identifier
#[derive(Debug, Clone)]
pub struct RawTrack {
    pub speaker_id: String,
    pub segments: Vec<RawSegment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognizer_output() {
        let json = r#"{
            "segments": [
                {"start": 0.0, "end": 2.4, "text": "hello there", "confidence": 0.93},
                {"start": 3.1, "end": 4.0, "text": "yes"}
            ]
        }"#;

        let output: RecognizerOutput = serde_json::from_str(json).unwrap();

        assert_eq!(output.segments.len(), 2);
        assert_eq!(output.segments[0].text, "hello there");
        assert_eq!(output.segments[0].confidence, Some(0.93));
        assert_eq!(output.segments[1].confidence, None);
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let json = r#"{
            "language": "en",
            "duration": 4.0,
            "segments": [
                {"start": 0.0, "end": 1.0, "text": "hi", "tokens": [1, 2], "temperature": 0.0}
            ]
        }"#;

        let output: RecognizerOutput = serde_json::from_str(json).unwrap();
        assert_eq!(output.segments.len(), 1);
    }

    #[test]
    fn test_parse_empty_document() {
        let output: RecognizerOutput = serde_json::from_str("{}").unwrap();
        assert!(output.segments.is_empty());
    }
}
