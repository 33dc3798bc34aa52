use serde::{Deserialize, Serialize};

/// Output of the audio-transcription service
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TranscriptionResult {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub segments: Vec<TranscriptionSegment>,
}

/// A single timed segment of recognized speech
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionSegment {
    /// Start offset in seconds
    #[serde(default)]
    pub start: f64,
    /// End offset in seconds
    #[serde(default)]
    pub end: f64,
    #[serde(default)]
    pub text: String,
}

impl TranscriptionSegment {
    /// Render as a `[MM:SS] text` transcript line
    pub fn to_line(&self) -> String {
        let start = self.start.max(0.0) as u64;
        format!("[{:02}:{:02}] {}", start / 60, start % 60, self.text.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_line_format() {
        let seg = TranscriptionSegment {
            start: 65.7,
            end: 70.0,
            text: "  Buenos días ".to_string(),
        };
        assert_eq!(seg.to_line(), "[01:05] Buenos días");
    }

    #[test]
    fn test_segment_past_an_hour_keeps_minutes() {
        let seg = TranscriptionSegment {
            start: 3_725.0,
            end: 3_730.0,
            text: "Cierre".to_string(),
        };
        assert_eq!(seg.to_line(), "[62:05] Cierre");
    }
}
