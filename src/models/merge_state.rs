use std::collections::{BTreeMap, HashSet};

use super::{ActionItem, Metadata, StructuredDocument, Topic, TopicDetail};

/// Accumulator for one transcript's chunked merge.
///
/// Created empty before the first fragment, threaded through each merge step
/// by value and consumed when the document is finalized. Never shared between
/// transcripts.
#[derive(Debug, Clone, Default)]
pub struct MergeState {
    /// Every identifier handed out so far
    pub used_ids: HashSet<String>,
    /// `normalized title | time` keys of accepted topics
    pub seen_topic_keys: HashSet<String>,
    pub main_points: Vec<Topic>,
    pub detailed_summary: BTreeMap<String, TopicDetail>,
    pub tasks_and_objectives: Vec<ActionItem>,
    /// Metadata of the first successfully parsed fragment
    pub metadata: Option<Metadata>,
    /// Number of partial results folded in
    pub fragments_merged: usize,
}

impl MergeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Titles of the most recent `limit` topics, oldest first
    pub fn recent_titles(&self, limit: usize) -> Vec<&str> {
        let skip = self.main_points.len().saturating_sub(limit);
        self.main_points
            .iter()
            .skip(skip)
            .map(|t| t.title.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.main_points.is_empty()
    }

    /// Snapshot as a document (metadata left as captured, or default)
    pub fn to_document(&self) -> StructuredDocument {
        StructuredDocument {
            metadata: self.metadata.clone().unwrap_or_default(),
            main_points: self.main_points.clone(),
            detailed_summary: self.detailed_summary.clone(),
            tasks_and_objectives: self.tasks_and_objectives.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_titles_keeps_tail_in_order() {
        let mut state = MergeState::new();
        for i in 0..7 {
            state
                .main_points
                .push(Topic::new(&format!("p{}", i), &format!("Tema {}", i), None));
        }

        let titles = state.recent_titles(5);
        assert_eq!(titles, vec!["Tema 2", "Tema 3", "Tema 4", "Tema 5", "Tema 6"]);
        assert_eq!(state.recent_titles(20).len(), 7);
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = MergeState::new();
        assert!(state.is_empty());
        assert!(state.recent_titles(5).is_empty());
        assert_eq!(state.to_document().metadata.title, "");
    }
}
