use crate::models::{
    ActionItem, MeetingInfo, MinutesDocument, MinutesRecord, Participant, RecordMetadata,
};
use crate::text::last_line_timestamp_seconds;

/// Normalize generated minutes against what is known about the meeting
///
/// The generated title wins over the stored one; the stored roster (with
/// e-mails) wins over generated participant names.
pub fn compose_minutes(
    meeting: &MeetingInfo,
    minutes: &MinutesDocument,
    default_title: &str,
) -> MinutesRecord {
    let objective = Some(minutes.objective.trim().to_string()).filter(|o| !o.is_empty());

    let title = [Some(minutes.metadata.title.as_str()), meeting.title.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .unwrap_or(default_title)
        .to_string();

    let duration_seconds = if meeting.transcript.trim().is_empty() {
        None
    } else {
        Some(last_line_timestamp_seconds(&meeting.transcript))
    };

    let metadata = RecordMetadata {
        title,
        date: meeting.uploaded_at.map(|d| d.to_rfc3339()),
        meeting_id: meeting
            .id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        duration_seconds,
    };

    let mut participants: Vec<Participant> = meeting
        .participants
        .iter()
        .filter(|p| !p.name.trim().is_empty())
        .map(|p| Participant {
            name: p.name.trim().to_string(),
            email: p
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        })
        .collect();
    if participants.is_empty() {
        participants = minutes
            .metadata
            .participants
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| Participant {
                name: n.to_string(),
                email: None,
            })
            .collect();
    }

    let tasks_and_objectives = minutes
        .tasks_and_objectives
        .iter()
        .filter(|t| !t.task.trim().is_empty())
        .map(|t| ActionItem {
            task: t.task.trim().to_string(),
            description: t.description.trim().to_string(),
        })
        .collect();

    MinutesRecord {
        objective,
        metadata,
        participants,
        key_points: minutes.main_points.clone(),
        details: minutes.details.clone(),
        tasks_and_objectives,
    }
}
