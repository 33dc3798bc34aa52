use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::models::{MergeState, Topic, TopicDetail};
use crate::text::{is_earlier, normalize_bullet, normalize_text};

/// Result of Stage 3 reconciliation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileResult {
    /// Topics folded into an earlier topic with the same title
    pub topics_merged: usize,
    /// Detail entries removed because no topic owns them
    pub orphans_removed: usize,
    /// Topics that had no detail and received an empty one
    pub details_created: usize,
}

fn has_time(time: Option<&str>) -> bool {
    time.is_some_and(|t| !t.trim().is_empty())
}

/// `candidate` replaces `current` when present and `current` is missing or later
fn earliest(current: Option<String>, candidate: Option<String>) -> Option<String> {
    if has_time(candidate.as_deref())
        && (!has_time(current.as_deref()) || is_earlier(candidate.as_deref(), current.as_deref()))
    {
        candidate
    } else {
        current
    }
}

/// Merge bullet content line by line
///
/// Keeps the non-blank lines of `base` and appends each non-blank line of
/// `new` whose normalized form is not already present.
pub fn merge_content(base: &str, new: &str) -> String {
    let mut merged: Vec<&str> = base.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut seen: HashSet<String> = merged.iter().map(|l| normalize_bullet(l)).collect();

    for line in new.lines().filter(|l| !l.trim().is_empty()) {
        if seen.insert(normalize_bullet(line)) {
            merged.push(line);
        }
    }

    merged.join("\n")
}

/// Merge `source` detail into `target`
///
/// Content is merged line by line, the earlier start time wins and key
/// timestamps are unioned by time and normalized description.
pub fn merge_details(
    target: Option<TopicDetail>,
    source: Option<TopicDetail>,
) -> Option<TopicDetail> {
    let (mut target, source) = match (target, source) {
        (None, source) => return source,
        (target, None) => return target,
        (Some(t), Some(s)) => (t, s),
    };

    target.content = merge_content(&target.content, &source.content);
    target.start_time = earliest(target.start_time.take(), source.start_time);
    if target.title.trim().is_empty() {
        target.title = source.title;
    }

    let mut existing: HashSet<(String, String)> = target
        .key_timestamps
        .iter()
        .map(|kt| citation_key(kt.time.as_deref(), &kt.description))
        .collect();
    for kt in source.key_timestamps {
        if existing.insert(citation_key(kt.time.as_deref(), &kt.description)) {
            target.key_timestamps.push(kt);
        }
    }

    Some(target)
}

fn citation_key(time: Option<&str>, description: &str) -> (String, String) {
    (
        time.unwrap_or("").trim().to_string(),
        normalize_text(description),
    )
}

/// Grouping signature: normalized title, or lowercased id for blank titles
fn signature(topic: &Topic) -> String {
    let normalized = normalize_text(&topic.title);
    if normalized.is_empty() {
        topic.id.to_lowercase()
    } else {
        normalized
    }
}

/// Execute Stage 3: merge same-titled topics across fragments
///
/// The first topic seen with a signature is canonical. Each later duplicate
/// lends its earlier time and its detail to the canonical topic and is then
/// dropped together with its own detail entry. Detail entries no surviving
/// topic owns are deleted, and surviving topics without detail get an empty one.
pub fn execute_stage3(state: &mut MergeState) -> ReconcileResult {
    let mut result = ReconcileResult::default();
    let mut canonical_index: HashMap<String, usize> = HashMap::new();
    let mut kept: Vec<Topic> = Vec::with_capacity(state.main_points.len());

    for topic in std::mem::take(&mut state.main_points) {
        let sig = signature(&topic);

        let Some(&idx) = canonical_index.get(&sig) else {
            canonical_index.insert(sig, kept.len());
            kept.push(topic);
            continue;
        };

        let canonical = &mut kept[idx];
        canonical.time = earliest(canonical.time.take(), topic.time);

        if topic.id != canonical.id {
            let duplicate_detail = state.detailed_summary.remove(&topic.id);
            let target = state.detailed_summary.remove(&canonical.id);
            if let Some(merged) = merge_details(target, duplicate_detail) {
                state.detailed_summary.insert(canonical.id.clone(), merged);
            }
        }
        result.topics_merged += 1;
    }

    let valid_ids: HashSet<&str> = kept.iter().map(|t| t.id.as_str()).collect();
    let before = state.detailed_summary.len();
    state
        .detailed_summary
        .retain(|id, _| valid_ids.contains(id.as_str()));
    result.orphans_removed = before - state.detailed_summary.len();

    for topic in &kept {
        if !state.detailed_summary.contains_key(&topic.id) {
            state.detailed_summary.insert(
                topic.id.clone(),
                TopicDetail {
                    title: topic.title.clone(),
                    start_time: topic.time.clone(),
                    ..Default::default()
                },
            );
            result.details_created += 1;
        }
    }

    state.main_points = kept;

    info!(
        "Stage 3: {} topics merged, {} orphan details removed, {} topics kept",
        result.topics_merged,
        result.orphans_removed,
        state.main_points.len()
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeyTimestamp;

    fn detail(content: &str, start: Option<&str>) -> TopicDetail {
        TopicDetail {
            title: String::new(),
            content: content.to_string(),
            key_timestamps: vec![],
            start_time: start.map(str::to_string),
        }
    }

    fn citation(description: &str, time: Option<&str>) -> KeyTimestamp {
        KeyTimestamp {
            description: description.to_string(),
            time: time.map(str::to_string),
        }
    }

    #[test]
    fn test_merge_content_skips_duplicates() {
        let merged = merge_content("- Uno\n\n- Dos", "* uno.\n- Tres\n");
        assert_eq!(merged, "- Uno\n- Dos\n- Tres");
    }

    #[test]
    fn test_merge_content_idempotent() {
        let content = "- Se revisa el presupuesto\n- Se aprueba la partida";
        assert_eq!(merge_content(content, content), content);
    }

    #[test]
    fn test_merge_content_empty_base() {
        assert_eq!(merge_content("", "- Uno\n\n- Dos"), "- Uno\n- Dos");
    }

    #[test]
    fn test_merge_details_start_time_and_citations() {
        let mut a = detail("- Uno", Some("05:02"));
        a.key_timestamps = vec![citation("Votación", Some("05:10"))];
        let mut b = detail("- Dos", Some("05:00"));
        b.key_timestamps = vec![
            citation("votación.", Some("05:10")),
            citation("Cierre", Some("06:00")),
        ];

        let merged = merge_details(Some(a), Some(b)).unwrap();
        assert_eq!(merged.content, "- Uno\n- Dos");
        assert_eq!(merged.start_time.as_deref(), Some("05:00"));
        assert_eq!(merged.key_timestamps.len(), 2);
        assert_eq!(merged.key_timestamps[1].description, "Cierre");
    }

    #[test]
    fn test_missing_start_time_never_earlier() {
        let merged =
            merge_details(Some(detail("", Some("05:00"))), Some(detail("", None))).unwrap();
        assert_eq!(merged.start_time.as_deref(), Some("05:00"));

        let merged =
            merge_details(Some(detail("", None)), Some(detail("", Some("07:00")))).unwrap();
        assert_eq!(merged.start_time.as_deref(), Some("07:00"));
    }

    #[test]
    fn test_merge_details_one_side_missing() {
        assert!(merge_details(None, None).is_none());
        let only = merge_details(None, Some(detail("- a", None))).unwrap();
        assert_eq!(only.content, "- a");
    }

    #[test]
    fn test_reconcile_merges_same_title() {
        let mut state = MergeState::new();
        state.main_points = vec![
            Topic::new("p1", "Presupuesto", Some("05:02")),
            Topic::new("p2", "Contratos", Some("08:00")),
            Topic::new("p1_1", "presupuesto ", Some("05:00")),
        ];
        state
            .detailed_summary
            .insert("p1".to_string(), detail("- Cifras\n- Partidas", None));
        state
            .detailed_summary
            .insert("p2".to_string(), detail("- Renovación", None));
        state
            .detailed_summary
            .insert("p1_1".to_string(), detail("- cifras\n- Aprobación", None));

        let result = execute_stage3(&mut state);

        assert_eq!(result.topics_merged, 1);
        assert_eq!(state.main_points.len(), 2);
        assert_eq!(state.main_points[0].time.as_deref(), Some("05:00"));
        assert_eq!(
            state.detailed_summary["p1"].content,
            "- Cifras\n- Partidas\n- Aprobación"
        );
        assert!(!state.detailed_summary.contains_key("p1_1"));
        assert!(state.to_document().is_consistent());
    }

    #[test]
    fn test_reconcile_removes_orphans() {
        let mut state = MergeState::new();
        state.main_points = vec![Topic::new("p1", "Uno", None)];
        state.detailed_summary.insert("p1".to_string(), detail("- a", None));
        state.detailed_summary.insert("ghost".to_string(), detail("- b", None));

        let result = execute_stage3(&mut state);

        assert_eq!(result.orphans_removed, 1);
        assert_eq!(state.detailed_summary.len(), 1);
    }

    #[test]
    fn test_reconcile_blank_titles_group_by_id() {
        let mut state = MergeState::new();
        state.main_points = vec![Topic::new("P1", "", None), Topic::new("p2", "  ", None)];

        let result = execute_stage3(&mut state);

        assert_eq!(result.topics_merged, 0);
        assert_eq!(result.details_created, 2);
        assert_eq!(state.main_points.len(), 2);
    }

    #[test]
    fn test_duplicate_time_kept_when_canonical_has_none() {
        let mut state = MergeState::new();
        state.main_points = vec![
            Topic::new("p1", "Cierre", None),
            Topic::new("p2", "Cierre", Some("40:00")),
        ];

        execute_stage3(&mut state);

        assert_eq!(state.main_points[0].time.as_deref(), Some("40:00"));
        assert_eq!(state.main_points[0].id, "p1");
    }
}
