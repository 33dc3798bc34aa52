use tracing::{info, warn};

use crate::llm::{
    Generator, build_minutes_prompt, build_minutes_system, minimum_topics, minutes_tool,
    repair_minutes,
};
use crate::models::{DEFAULT_TITLE, MinutesDocument, clean_participants};
use crate::text::{Anonymizer, DEFAULT_PLACEHOLDER, last_timestamp};

use super::backfill_details;

/// Configuration for one-shot minutes
#[derive(Debug, Clone)]
pub struct MinutesConfig {
    /// Details shorter than this many characters are regenerated
    pub min_detail_chars: usize,
    /// Transcript lines used when a point's window matches nothing
    pub fallback_lines: usize,
    pub min_topics_floor: u32,
    pub minutes_per_topic: u32,
    pub end_tolerance_minutes: u32,
    pub default_title: String,
    /// Replacement for participant names
    pub placeholder: String,
}

impl Default for MinutesConfig {
    fn default() -> Self {
        Self {
            min_detail_chars: 80,
            fallback_lines: 300,
            min_topics_floor: 4,
            minutes_per_topic: 5,
            end_tolerance_minutes: 2,
            default_title: DEFAULT_TITLE.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Generate minutes for a whole transcript in one request
///
/// Thin details are then backfilled from their transcript windows and names
/// are anonymized. Never fails: a failed main request, or names that cannot
/// be anonymized, yield an empty but well-formed document.
pub async fn generate_minutes<G: Generator + ?Sized>(
    generator: &G,
    transcript: &str,
    participants: &[String],
    config: &MinutesConfig,
) -> MinutesDocument {
    let participants = clean_participants(participants);
    let anonymizer = match Anonymizer::with_placeholder(&participants, &config.placeholder) {
        Ok(anonymizer) => anonymizer,
        Err(e) => {
            warn!("Participant names cannot be anonymized, returning empty minutes: {}", e);
            return MinutesDocument::empty(&config.default_title);
        }
    };

    let last_seconds = last_timestamp(transcript).unwrap_or(0);
    let min_topics = minimum_topics(
        last_seconds / 60,
        config.min_topics_floor,
        config.minutes_per_topic,
    );
    let system = build_minutes_system(
        &participants,
        last_seconds,
        min_topics,
        config.end_tolerance_minutes,
    );

    info!(
        "Minutes: one-shot request ({} min, at least {} points)",
        last_seconds / 60,
        min_topics
    );

    let payload = match generator
        .generate_structured(&system, &build_minutes_prompt(transcript), &minutes_tool())
        .await
    {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Minutes generation failed, returning empty minutes: {:#}", e);
            return MinutesDocument::empty(&config.default_title);
        }
    };

    let mut minutes = match repair_minutes(payload, &participants, &config.default_title) {
        Ok(minutes) => minutes,
        Err(e) => {
            warn!("Minutes payload rejected, returning empty minutes: {}", e);
            return MinutesDocument::empty(&config.default_title);
        }
    };

    let filled = backfill_details(generator, &mut minutes, transcript, config).await;
    info!(
        "Minutes: {} points, {} details backfilled, {} tasks",
        minutes.main_points.len(),
        filled,
        minutes.tasks_and_objectives.len()
    );

    anonymize_minutes(&mut minutes, &anonymizer);

    minutes
}

/// Replace participant names in every free-text field
pub fn anonymize_minutes(minutes: &mut MinutesDocument, anonymizer: &Anonymizer) {
    if anonymizer.is_noop() {
        return;
    }

    minutes.objective = anonymizer.apply(&minutes.objective);
    for detail in minutes.details.values_mut() {
        detail.content = anonymizer.apply(&detail.content);
    }
    for item in &mut minutes.tasks_and_objectives {
        item.description = anonymizer.apply(&item.description);
    }
}
