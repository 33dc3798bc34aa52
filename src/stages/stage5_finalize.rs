use tracing::info;

use crate::error::DigestError;
use crate::models::{MergeState, Metadata, StructuredDocument};

/// Execute Stage 5: turn the accumulated state into the final document
///
/// Zero surviving topics is a hard failure. Missing metadata gets
/// `default_title`, and an empty participant list is filled from `participants`.
pub fn execute_stage5(
    state: MergeState,
    participants: &[String],
    default_title: &str,
) -> Result<StructuredDocument, DigestError> {
    if state.main_points.is_empty() {
        return Err(DigestError::NoTopics);
    }

    let mut metadata = state.metadata.unwrap_or_else(|| Metadata {
        title: default_title.to_string(),
        participants: Vec::new(),
    });
    if metadata.participants.is_empty() && !participants.is_empty() {
        metadata.participants = participants.to_vec();
    }

    info!(
        "Stage 5: {} main points, {} details, {} tasks",
        state.main_points.len(),
        state.detailed_summary.len(),
        state.tasks_and_objectives.len()
    );

    Ok(StructuredDocument {
        metadata,
        main_points: state.main_points,
        detailed_summary: state.detailed_summary,
        tasks_and_objectives: state.tasks_and_objectives,
    })
}
