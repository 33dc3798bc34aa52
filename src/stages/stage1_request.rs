use tracing::{debug, warn};

use crate::error::DigestError;
use crate::llm::{
    Generator, ToolSpec, build_duration_guidance, build_followup_guidance, build_fragment_prompt,
    minimum_topics, repair_summary,
};
use crate::models::{MergeState, StructuredDocument};

/// Configuration for Stage 1 requests
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// How many of the most recent topic titles are sent as "already covered"
    pub context_topics: usize,
    /// Lower bound on the number of topics requested for the first fragment
    pub min_topics_floor: u32,
    /// One topic is requested per this many minutes of meeting
    pub minutes_per_topic: u32,
    /// How close the last topic must be to the end of the meeting
    pub end_tolerance_minutes: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            context_topics: 5,
            min_topics_floor: 3,
            minutes_per_topic: 10,
            end_tolerance_minutes: 2,
        }
    }
}

/// Guidance for fragment `index`
///
/// The first fragment gets duration guidance computed from the transcript's
/// last timestamp; later fragments get the titles already accumulated.
pub fn build_guidance(
    index: usize,
    state: &MergeState,
    last_seconds: u32,
    config: &RequestConfig,
) -> String {
    if index == 0 {
        let min_topics = minimum_topics(
            last_seconds / 60,
            config.min_topics_floor,
            config.minutes_per_topic,
        );
        build_duration_guidance(last_seconds, min_topics, config.end_tolerance_minutes)
    } else {
        build_followup_guidance(&state.recent_titles(config.context_topics))
    }
}

/// Request and repair the partial summary of one fragment
pub async fn request_fragment<G: Generator + ?Sized>(
    generator: &G,
    system: &[String],
    guidance: String,
    fragment: &str,
    tool: &ToolSpec,
) -> Result<StructuredDocument, DigestError> {
    let mut instructions = system.to_vec();
    instructions.push(guidance);

    let payload = generator
        .generate_structured(&instructions, &build_fragment_prompt(fragment), tool)
        .await?;

    repair_summary(payload)
}

/// Execute Stage 1 for one fragment, failing soft
///
/// Transport and schema failures are logged and turn into `None`; the
/// fragment is skipped without retry.
pub async fn execute_stage1<G: Generator + ?Sized>(
    generator: &G,
    system: &[String],
    state: &MergeState,
    index: usize,
    fragment: &str,
    last_seconds: u32,
    tool: &ToolSpec,
    config: &RequestConfig,
) -> Option<StructuredDocument> {
    let guidance = build_guidance(index, state, last_seconds, config);

    match request_fragment(generator, system, guidance, fragment, tool).await {
        Ok(partial) => {
            debug!(
                "Fragment {}: {} main points, {} details, {} tasks",
                index + 1,
                partial.main_points.len(),
                partial.detailed_summary.len(),
                partial.tasks_and_objectives.len()
            );
            Some(partial)
        }
        Err(e) => {
            warn!("Fragment {} skipped: {}", index + 1, e);
            None
        }
    }
}
