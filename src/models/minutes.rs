use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActionItem, Metadata, Topic};

/// Detail entry of the one-shot minutes (no citations)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinutesDetail {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Minutes produced in a single generation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MinutesDocument {
    /// One to three sentences stating the purpose of the meeting
    #[serde(default)]
    pub objective: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub main_points: Vec<Topic>,
    #[serde(default)]
    pub details: BTreeMap<String, MinutesDetail>,
    #[serde(default)]
    pub tasks_and_objectives: Vec<ActionItem>,
}

impl MinutesDocument {
    /// Well-formed document with no content, returned when generation fails
    pub fn empty(title: &str) -> Self {
        Self {
            metadata: Metadata {
                title: title.to_string(),
                participants: Vec::new(),
            },
            ..Default::default()
        }
    }
}

/// A meeting attendee as known to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// What the caller knows about the meeting before generation
#[derive(Debug, Clone, Default)]
pub struct MeetingInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    /// Full `[MM:SS]` transcript
    pub transcript: String,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub meeting_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

/// Minutes normalized for storage and delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinutesRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    pub metadata: RecordMetadata,
    pub participants: Vec<Participant>,
    pub key_points: Vec<Topic>,
    pub details: BTreeMap<String, MinutesDetail>,
    pub tasks_and_objectives: Vec<ActionItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_minutes_is_well_formed() {
        let doc = MinutesDocument::empty("Acta de Reunión");
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["metadata"]["title"], "Acta de Reunión");
        assert_eq!(json["main_points"].as_array().unwrap().len(), 0);
        assert_eq!(json["tasks_and_objectives"].as_array().unwrap().len(), 0);
        assert!(json["details"].as_object().unwrap().is_empty());
    }
}
