use std::collections::HashSet;

use tracing::debug;

use crate::models::{MergeState, StructuredDocument};
use crate::text::topic_key;

/// Counters for one merge step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeStats {
    pub accepted: usize,
    /// Topics dropped because their title and time were already seen
    pub duplicates_dropped: usize,
    /// Topics whose id was empty or already taken
    pub ids_reassigned: usize,
    pub details_attached: usize,
    pub tasks_added: usize,
}

/// Smallest `base`, `base_1`, `base_2`, ... not yet used; records it as used
fn ensure_unique_id(used_ids: &mut HashSet<String>, base: &str) -> String {
    let mut candidate = base.to_string();
    let mut suffix = 1;
    while used_ids.contains(&candidate) {
        candidate = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    used_ids.insert(candidate.clone());
    candidate
}

/// Execute Stage 2: fold one partial result into the accumulated state
///
/// 1. Re-sync used ids with current topics and details
/// 2. Drop topics whose normalized title and time were already seen
/// 3. Give empty or colliding ids a fresh suffixed id
/// 4. Attach each topic's detail under its final id
/// 5. Append action items as they come
pub fn merge_partial(
    mut state: MergeState,
    partial: StructuredDocument,
) -> (MergeState, MergeStats) {
    let mut stats = MergeStats::default();

    state
        .used_ids
        .extend(state.main_points.iter().map(|t| t.id.clone()));
    state
        .used_ids
        .extend(state.detailed_summary.keys().cloned());

    let StructuredDocument {
        metadata,
        main_points,
        detailed_summary: incoming_details,
        tasks_and_objectives,
    } = partial;

    if state.metadata.is_none() {
        state.metadata = Some(metadata);
    }

    for mut topic in main_points {
        let key = topic_key(&topic.title, topic.time.as_deref());
        if state.seen_topic_keys.contains(&key) {
            debug!("Dropping repeated topic {:?} ({})", topic.title, key);
            stats.duplicates_dropped += 1;
            continue;
        }

        let original_id = topic.id.trim().to_string();
        if original_id.is_empty() || state.used_ids.contains(&original_id) {
            let base = if original_id.is_empty() {
                format!("pt_{}", state.main_points.len() + 1)
            } else {
                original_id.clone()
            };
            topic.id = ensure_unique_id(&mut state.used_ids, &base);
            stats.ids_reassigned += 1;
        } else {
            topic.id = original_id.clone();
            state.used_ids.insert(original_id.clone());
        }

        let detail = incoming_details
            .get(&original_id)
            .or_else(|| incoming_details.get(&topic.id))
            .cloned();

        if let Some(detail) = detail {
            if state.detailed_summary.contains_key(&topic.id) {
                topic.id = ensure_unique_id(&mut state.used_ids, &topic.id);
            }
            state.detailed_summary.insert(topic.id.clone(), detail);
            stats.details_attached += 1;
        }

        state.seen_topic_keys.insert(key);
        state.main_points.push(topic);
        stats.accepted += 1;
    }

    stats.tasks_added = tasks_and_objectives.len();
    state.tasks_and_objectives.extend(tasks_and_objectives);
    state.fragments_merged += 1;

    (state, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionItem, Metadata, Topic, TopicDetail};

    fn partial(title: &str, topics: Vec<Topic>) -> StructuredDocument {
        let mut doc = StructuredDocument {
            metadata: Metadata {
                title: title.to_string(),
                participants: vec![],
            },
            ..Default::default()
        };
        for topic in topics {
            doc.detailed_summary.insert(
                topic.id.clone(),
                TopicDetail {
                    title: topic.title.clone(),
                    content: format!("- Detalle de {}", topic.title),
                    ..Default::default()
                },
            );
            doc.main_points.push(topic);
        }
        doc
    }

    #[test]
    fn test_colliding_id_is_suffixed() {
        let state = MergeState::new();
        let (state, _) = merge_partial(
            state,
            partial("Comité", vec![Topic::new("p1", "Apertura", Some("00:00"))]),
        );
        let (state, stats) = merge_partial(
            state,
            partial("Otro", vec![Topic::new("p1", "Presupuesto", Some("05:00"))]),
        );

        assert_eq!(stats.ids_reassigned, 1);
        let ids: Vec<&str> = state.main_points.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p1_1"]);
        assert_eq!(state.detailed_summary["p1"].title, "Apertura");
        assert_eq!(state.detailed_summary["p1_1"].title, "Presupuesto");
        assert_eq!(state.metadata.as_ref().unwrap().title, "Comité");
    }

    #[test]
    fn test_repeated_title_and_time_dropped() {
        let (state, _) = merge_partial(
            MergeState::new(),
            partial("A", vec![Topic::new("p1", "Presupuesto", Some("05:00"))]),
        );
        let (state, stats) = merge_partial(
            state,
            partial("B", vec![Topic::new("p9", " presupuesto. ", Some("05:00"))]),
        );

        assert_eq!(stats.duplicates_dropped, 1);
        assert_eq!(state.main_points.len(), 1);
        assert!(!state.detailed_summary.contains_key("p9"));
    }

    #[test]
    fn test_same_title_different_time_kept() {
        let (state, _) = merge_partial(
            MergeState::new(),
            partial("A", vec![Topic::new("p1", "Presupuesto", Some("05:00"))]),
        );
        let (state, _) = merge_partial(
            state,
            partial("B", vec![Topic::new("p1", "Presupuesto", Some("05:02"))]),
        );
        assert_eq!(state.main_points.len(), 2);
    }

    #[test]
    fn test_empty_id_gets_positional_fallback() {
        let mut doc = partial("A", vec![Topic::new("p1", "Uno", None)]);
        doc.main_points.push(Topic::new("", "Dos", None));
        doc.main_points.push(Topic::new("  ", "Tres", None));

        let (state, stats) = merge_partial(MergeState::new(), doc);

        let ids: Vec<&str> = state.main_points.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "pt_2", "pt_3"]);
        assert_eq!(stats.ids_reassigned, 2);
    }

    #[test]
    fn test_suffix_skips_taken_ids() {
        let mut state = MergeState::new();
        state.used_ids.insert("p1".to_string());
        state.used_ids.insert("p1_1".to_string());

        let (state, _) = merge_partial(state, partial("A", vec![Topic::new("p1", "Uno", None)]));
        assert_eq!(state.main_points[0].id, "p1_2");
        assert!(state.detailed_summary.contains_key("p1_2"));
    }

    #[test]
    fn test_duplicate_ids_within_fragment() {
        let mut doc = partial("A", vec![Topic::new("p1", "Uno", None)]);
        doc.main_points.push(Topic::new("p1", "Dos", None));

        let (state, _) = merge_partial(MergeState::new(), doc);

        assert_eq!(state.main_points[1].id, "p1_1");
        assert!(state.to_document().is_consistent());
    }

    #[test]
    fn test_only_first_metadata_kept_and_tasks_appended() {
        let mut first = partial("Primero", vec![Topic::new("p1", "Uno", None)]);
        first.tasks_and_objectives.push(ActionItem {
            task: "Enviar acta".to_string(),
            description: String::new(),
        });
        let mut second = partial("Segundo", vec![Topic::new("p2", "Dos", None)]);
        second.tasks_and_objectives.push(ActionItem {
            task: "Enviar acta".to_string(),
            description: String::new(),
        });

        let (state, _) = merge_partial(MergeState::new(), first);
        let (state, stats) = merge_partial(state, second);

        assert_eq!(state.metadata.unwrap().title, "Primero");
        assert_eq!(state.tasks_and_objectives.len(), 2);
        assert_eq!(stats.tasks_added, 1);
        assert_eq!(state.fragments_merged, 2);
    }

    #[test]
    fn test_topic_without_detail() {
        let mut doc = partial("A", vec![]);
        doc.main_points.push(Topic::new("p1", "Uno", None));

        let (state, stats) = merge_partial(MergeState::new(), doc);
        assert_eq!(stats.details_attached, 0);
        assert!(state.detailed_summary.is_empty());
    }
}
