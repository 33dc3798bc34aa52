use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Title used when no generated title is available
pub const DEFAULT_TITLE: &str = "Acta de Reunión";

/// Trimmed participant names with blanks removed
pub fn clean_participants(participants: &[String]) -> Vec<String> {
    participants
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Document-level metadata reported by the generation service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Meeting title
    pub title: String,
    /// Participant names as reported (or injected from the roster)
    #[serde(default)]
    pub participants: Vec<String>,
}

/// One agenda item ("main point") extracted from the meeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Identifier, unique within a document once merged
    pub id: String,
    pub title: String,
    /// Start time as "MM:SS"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl Topic {
    pub fn new(id: &str, title: &str, time: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            time: time.map(str::to_string),
        }
    }
}

/// A cited moment inside a topic's detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTimestamp {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Expanded bullet content for one topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicDetail {
    #[serde(default)]
    pub title: String,
    /// Newline-separated bullet lines, conventionally prefixed with "- "
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub key_timestamps: Vec<KeyTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl TopicDetail {
    /// Non-blank content lines in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines().filter(|l| !l.trim().is_empty())
    }
}

/// A task, commitment or objective agreed during the meeting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    /// Short task title, never empty after repair
    pub task: String,
    #[serde(default)]
    pub description: String,
}

/// The structured summary, both as a per-fragment partial and as the final artifact
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    pub metadata: Metadata,
    #[serde(default)]
    pub main_points: Vec<Topic>,
    #[serde(default)]
    pub detailed_summary: BTreeMap<String, TopicDetail>,
    #[serde(default)]
    pub tasks_and_objectives: Vec<ActionItem>,
}

impl StructuredDocument {
    pub fn topic_count(&self) -> usize {
        self.main_points.len()
    }

    /// Detail for a topic, if any
    pub fn detail_for(&self, topic: &Topic) -> Option<&TopicDetail> {
        self.detailed_summary.get(&topic.id)
    }

    /// True when every detail key matches exactly one topic id and ids are unique
    pub fn is_consistent(&self) -> bool {
        let mut ids = std::collections::HashSet::new();
        for topic in &self.main_points {
            if !ids.insert(topic.id.as_str()) {
                return false;
            }
        }
        self.detailed_summary.keys().all(|k| ids.contains(k.as_str()))
    }
}
