use std::collections::HashSet;

use tracing::info;

use crate::models::MergeState;
use crate::text::normalize_bullet;

/// Result of Stage 4 deduplication
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupeResult {
    pub lines_removed: usize,
    /// Topics whose every line was a repeat and kept their first line anyway
    pub topics_kept_first_line: usize,
}

/// Execute Stage 4: remove bullet lines repeated across topics
///
/// Walks topics in final order with one global set of normalized bullets.
/// A line survives only the first time its normalized form appears anywhere.
/// A topic never ends up with empty content: if all its lines are repeats,
/// its first line is kept.
pub fn execute_stage4(state: &mut MergeState) -> DedupeResult {
    let mut result = DedupeResult::default();
    let mut seen_global: HashSet<String> = HashSet::new();

    for topic in &state.main_points {
        let Some(detail) = state.detailed_summary.get_mut(&topic.id) else {
            continue;
        };

        let lines: Vec<&str> = detail.lines().collect();
        if lines.is_empty() {
            continue;
        }

        let mut seen_local: HashSet<String> = HashSet::new();
        let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
        for &line in &lines {
            let norm = normalize_bullet(line);
            if seen_global.contains(&norm) || seen_local.contains(&norm) {
                continue;
            }
            seen_global.insert(norm.clone());
            seen_local.insert(norm);
            kept.push(line);
        }

        result.lines_removed += lines.len() - kept.len();
        if kept.is_empty() {
            kept.push(lines[0]);
            result.lines_removed -= 1;
            result.topics_kept_first_line += 1;
        }

        let content = kept.join("\n");
        detail.content = content;
    }

    info!(
        "Stage 4: {} repeated bullet lines removed",
        result.lines_removed
    );

    result
}
