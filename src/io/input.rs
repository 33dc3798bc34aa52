use std::path::Path;

use anyhow::{Context, Result};

use crate::models::{Participant, TranscriptionResult};

/// Load a transcript as `[MM:SS]` text
///
/// `.json` files are read as transcription output with timed segments; any
/// other file is taken as already timestamped text.
pub fn load_transcript(path: &Path) -> Result<String> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_segments_json(&content)
    } else {
        Ok(content)
    }
}

/// Render transcription JSON into one `[MM:SS] text` line per segment
pub fn parse_segments_json(json: &str) -> Result<String> {
    let result: TranscriptionResult =
        serde_json::from_str(json).context("Failed to parse transcription JSON")?;
    Ok(render_segments(&result))
}

pub fn render_segments(result: &TranscriptionResult) -> String {
    let mut text = String::new();
    for segment in &result.segments {
        text.push_str(&segment.to_line());
        text.push('\n');
    }
    text
}

/// Parse participants given as `Name` or `Name <email>`
pub fn parse_participant(raw: &str) -> Option<Participant> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some((name, rest)) = raw.split_once('<') {
        let email = rest.trim_end_matches('>').trim();
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        return Some(Participant {
            name: name.to_string(),
            email: Some(email.to_string()).filter(|e| !e.is_empty()),
        });
    }

    Some(Participant {
        name: raw.to_string(),
        email: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segments_json() {
        let json = r#"{
            "language": "es",
            "duration": 75.0,
            "segments": [
                {"start": 0.0, "end": 4.2, "text": " Hola a todos"},
                {"start": 65.4, "end": 70.0, "text": "Hablamos del presupuesto "}
            ]
        }"#;

        let text = parse_segments_json(json).unwrap();
        assert_eq!(text, "[00:00] Hola a todos\n[01:05] Hablamos del presupuesto\n");
    }

    #[test]
    fn test_empty_segments() {
        assert_eq!(parse_segments_json(r#"{"segments": []}"#).unwrap(), "");
        assert!(parse_segments_json("not json").is_err());
    }

    #[test]
    fn test_load_transcript_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let txt = dir.path().join("meeting.txt");
        std::fs::write(&txt, "[00:00] Hola").unwrap();
        assert_eq!(load_transcript(&txt).unwrap(), "[00:00] Hola");

        let json = dir.path().join("meeting.JSON");
        std::fs::write(&json, r#"{"segments": [{"start": 3, "end": 4, "text": "Hola"}]}"#).unwrap();
        assert_eq!(load_transcript(&json).unwrap(), "[00:03] Hola\n");

        assert!(load_transcript(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_parse_participant() {
        assert_eq!(parse_participant("  "), None);
        assert_eq!(parse_participant(" Ana Ruiz ").unwrap().name, "Ana Ruiz");
        let p = parse_participant("Luis Mora <luis@example.com>").unwrap();
        assert_eq!(p.name, "Luis Mora");
        assert_eq!(p.email.as_deref(), Some("luis@example.com"));
        assert_eq!(parse_participant("<x@y.z>"), None);
    }
}
