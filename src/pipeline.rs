use tracing::info;

use crate::error::DigestError;
use crate::llm::{Generator, build_summary_system, summary_tool};
use crate::models::{DEFAULT_TITLE, MergeState, StructuredDocument, clean_participants};
use crate::stages::{
    ChunkConfig, RequestConfig, execute_stage1, execute_stage3, execute_stage4, execute_stage5,
    merge_partial, split_text,
};
use crate::text::last_timestamp;

/// Configuration for the chunked summary
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    pub chunk: ChunkConfig,
    pub request: RequestConfig,
    /// Title used when no fragment reported metadata
    pub default_title: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            chunk: ChunkConfig::default(),
            request: RequestConfig::default(),
            default_title: DEFAULT_TITLE.to_string(),
        }
    }
}

/// Summarize a `[MM:SS]` transcript into one structured document
///
/// Fragments are requested strictly in order: each request carries the titles
/// accumulated from the previous ones. Failed fragments are skipped. Fails
/// with [`DigestError::NoTopics`] when no topic survives.
pub async fn summarize_transcript<G: Generator + ?Sized>(
    generator: &G,
    transcript: &str,
    participants: &[String],
    config: &SummaryConfig,
) -> Result<StructuredDocument, DigestError> {
    let participants = clean_participants(participants);
    let fragments = split_text(transcript, config.chunk.max_chars);
    if fragments.is_empty() {
        return Err(DigestError::EmptyTranscript);
    }

    let last_seconds = last_timestamp(transcript).unwrap_or(0);
    let system = build_summary_system(&participants);
    let tool = summary_tool();

    info!(
        "Stage 0: transcript split into {} fragments (last timestamp {}s)",
        fragments.len(),
        last_seconds
    );

    let mut state = MergeState::new();
    let mut skipped = 0;

    for (index, fragment) in fragments.iter().enumerate() {
        info!("Stage 1: requesting fragment {}/{}", index + 1, fragments.len());

        let partial = execute_stage1(
            generator,
            &system,
            &state,
            index,
            fragment,
            last_seconds,
            &tool,
            &config.request,
        )
        .await;

        let Some(partial) = partial else {
            skipped += 1;
            continue;
        };

        let (merged, stats) = merge_partial(state, partial);
        state = merged;
        info!(
            "Stage 2: fragment {} merged, {} accepted, {} repeated, {} re-keyed; {} topics total",
            index + 1,
            stats.accepted,
            stats.duplicates_dropped,
            stats.ids_reassigned,
            state.main_points.len()
        );
    }

    info!(
        "Stage 1: {} fragments merged, {} skipped",
        state.fragments_merged, skipped
    );

    execute_stage3(&mut state);
    execute_stage4(&mut state);
    execute_stage5(state, &participants, &config.default_title)
}
