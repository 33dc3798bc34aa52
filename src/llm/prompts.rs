use crate::text::format_mmss;

/// Every generated summary is written in this language
pub const OUTPUT_LANGUAGE: &str = "Spanish";

/// System prompt for chunked structured summaries
pub const SUMMARY_SYSTEM_PROMPT: &str = r#"You are an expert at analysing and summarising business meetings. Produce a formal structured summary of a meeting transcript by calling the format_meeting_summary tool.

The transcript carries inline timestamps in the form [MM:SS] at the start of its segments. Use them to fill every time field.

MANDATORY RULES:
1. Every entry in main_points MUST have a matching entry in detailed_summary under the same id.
2. detailed_summary must not be empty, and each item must cite at least one key_timestamps entry with a valid time.
3. time and start_time must not be "00:00" unless the conversation really starts there.
4. content is ONE string holding 2 to 4 detailed bullets. Each bullet starts with "- " and bullets are separated by newlines. Never send a JSON list for content.
5. Each bullet carries information specific to its own point. Do not repeat the same information under different points.
6. tasks_and_objectives may be left empty; action items are extracted elsewhere."#;

/// System prompt for one-shot minutes
pub const MINUTES_SYSTEM_PROMPT: &str = r#"You are an expert meeting analyst. Produce complete and detailed meeting minutes from a transcript by calling the format_meeting_minutes tool.

The transcript carries inline timestamps in the form [MM:SS]; use them for every time field.

MANDATORY RULES:
1. objective: one to three clear sentences stating the main purpose of the meeting.
2. metadata: a descriptive professional title and the participant list provided.
3. main_points: 5 to 10 key points spread over the whole meeting, each with a unique id (point_1, point_2, ...), a title of at most 12 words and a time "MM:SS". The last point must be close to the end.
4. details: keyed by main_points id. content is ONE string with only 2 or 3 concise bullets starting with "- ", separated by newlines, with at most one sub-bullet each. Include concrete figures, decisions and incidents.
5. Never name people ("Jeff said", "María commented"); describe facts impersonally ("it was agreed", "the technical team reported").
6. tasks_and_objectives: every action, commitment, next step and agreed objective, each with a concise task and an impersonal description. When no explicit task exists, list the implicit objectives."#;

/// System prompt for filling the detail of a single minutes point
pub const DETAIL_BACKFILL_SYSTEM_PROMPT: &str = r#"Write the detail section of one point of meeting minutes.

RULES:
- Return ONLY bullet text, not JSON.
- Each bullet starts with "- ".
- Only 2 or 3 bullets, each a short direct sentence.
- At most one sub-bullet per bullet, only when essential.
- Never name people or write "X said"; describe everything impersonally.
- Include figures, decisions, incidents and proposals when they appear in the segment."#;

fn language_rule() -> String {
    format!("The output MUST be written in {}.", OUTPUT_LANGUAGE)
}

fn participants_line(participants: &[String]) -> String {
    if participants.is_empty() {
        "Participants: not specified".to_string()
    } else {
        format!("Participants: {}", participants.join(", "))
    }
}

/// Minimum topic count for a meeting of `total_minutes`
pub fn minimum_topics(total_minutes: u32, floor: u32, minutes_per_topic: u32) -> u32 {
    floor.max(total_minutes / minutes_per_topic.max(1) + 1)
}

/// System instructions shared by every chunked request
pub fn build_summary_system(participants: &[String]) -> Vec<String> {
    vec![
        SUMMARY_SYSTEM_PROMPT.to_string(),
        participants_line(participants),
        language_rule(),
    ]
}

/// Extra guidance for the first fragment, derived from the last transcript timestamp
pub fn build_duration_guidance(
    last_seconds: u32,
    min_topics: u32,
    end_tolerance_minutes: u32,
) -> String {
    let final_ts = format_mmss(last_seconds);
    format!(
        "The detected total duration of the meeting is about {} minutes (final timestamp: {}). \
         Generate at least {} main points in main_points, spread across the whole timeline, \
         so that the last main_points.time is no more than {} minutes from {}. \
         Make sure every main point has its detailed_summary entry.",
        last_seconds / 60,
        final_ts,
        min_topics,
        end_tolerance_minutes,
        final_ts
    )
}

/// Extra guidance for later fragments, listing topics already covered
pub fn build_followup_guidance(covered_titles: &[&str]) -> String {
    if covered_titles.is_empty() {
        return "Generate ONLY main_points and detailed_summary for the next fragment of the meeting \
                (do not repeat metadata or tasks_and_objectives). Follow exactly the same structure."
            .to_string();
    }

    let mut prompt = String::from("These topics were already covered in earlier fragments:\n");
    for title in covered_titles {
        prompt.push_str(&format!("- {}\n", title));
    }
    prompt.push('\n');
    prompt.push_str(
        "Now generate ONLY main_points and detailed_summary for the next fragment of the meeting \
         (do not repeat metadata or tasks_and_objectives). CRITICAL: do not repeat or rephrase \
         the topics listed above. Focus ONLY on new information from this fragment. \
         Follow exactly the same structure.",
    );
    prompt
}

/// User prompt carrying one transcript fragment
pub fn build_fragment_prompt(fragment: &str) -> String {
    format!(
        "Generate or continue the structured summary for the following timestamped fragment:\n\n{}",
        fragment
    )
}

/// System instructions for one-shot minutes
pub fn build_minutes_system(
    participants: &[String],
    last_seconds: u32,
    min_topics: u32,
    end_tolerance_minutes: u32,
) -> Vec<String> {
    vec![
        MINUTES_SYSTEM_PROMPT.to_string(),
        participants_line(participants),
        build_duration_guidance(last_seconds, min_topics, end_tolerance_minutes),
        language_rule(),
    ]
}

/// User prompt carrying the whole transcript
pub fn build_minutes_prompt(transcript: &str) -> String {
    format!(
        "Generate the meeting minutes for the following timestamped transcript:\n\n{}",
        transcript
    )
}

pub fn build_backfill_system() -> Vec<String> {
    vec![DETAIL_BACKFILL_SYSTEM_PROMPT.to_string(), language_rule()]
}

/// User prompt for one point's detail, scoped to its transcript window
pub fn build_backfill_prompt(point_title: &str, segment: &str) -> String {
    format!(
        "Point title: {}\n\nTranscript segment (with timestamps):\n'''\n{}\n'''\n\nReturn ONLY the bullet text:",
        point_title, segment
    )
}
