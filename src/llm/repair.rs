use serde_json::{Map, Value, json};

use crate::error::DigestError;
use crate::models::{MinutesDocument, StructuredDocument};

/// Title used when a partial result omits one
pub const UNTITLED: &str = "(Sin título)";

/// Maximum length of a task title synthesized from its description
const SYNTHESIZED_TASK_CHARS: usize = 80;

/// Coerce a loosely shaped summary payload and validate it
///
/// Fixes the shapes models commonly get wrong before strict deserialization:
/// missing title, non-list topics, task entries without a task, detail given
/// as a list, and bare-string citations.
pub fn repair_summary(value: Value) -> Result<StructuredDocument, DigestError> {
    let mut root = into_object(value)?;

    repair_metadata(&mut root, UNTITLED, &[]);
    ensure_list(&mut root, "main_points");
    repair_tasks(&mut root);

    let details = root.remove("detailed_summary").unwrap_or(Value::Null);
    let mut details = details_to_map(details);
    for item in details.values_mut() {
        repair_detail_item(item);
    }
    root.insert("detailed_summary".to_string(), Value::Object(details));

    Ok(serde_json::from_value(Value::Object(root))?)
}

/// Coerce a one-shot minutes payload and validate it
pub fn repair_minutes(
    value: Value,
    participants: &[String],
    default_title: &str,
) -> Result<MinutesDocument, DigestError> {
    let mut root = into_object(value)?;

    if !root.get("objective").is_some_and(Value::is_string) {
        let objective = root.get("objective").map(value_to_string).unwrap_or_default();
        root.insert("objective".to_string(), Value::String(objective));
    }
    repair_metadata(&mut root, default_title, participants);
    ensure_list(&mut root, "main_points");
    repair_tasks(&mut root);

    let details = root.remove("details").unwrap_or(Value::Null);
    let mut details = details_to_map(details);
    for item in details.values_mut() {
        if !item.is_object() {
            *item = json!({"title": "", "content": value_to_string(item)});
        }
        if let Some(obj) = item.as_object_mut() {
            obj.entry("title").or_insert_with(|| Value::String(String::new()));
            repair_content(obj);
        }
    }
    root.insert("details".to_string(), Value::Object(details));

    Ok(serde_json::from_value(Value::Object(root))?)
}

fn into_object(value: Value) -> Result<Map<String, Value>, DigestError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::String(raw) => match serde_json::from_str(&raw)? {
            Value::Object(map) => Ok(map),
            other => Err(DigestError::Schema(format!(
                "expected a JSON object, got {}",
                kind(&other)
            ))),
        },
        other => Err(DigestError::Schema(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn ensure_list(root: &mut Map<String, Value>, key: &str) {
    if !root.get(key).is_some_and(Value::is_array) {
        root.insert(key.to_string(), Value::Array(Vec::new()));
    }
}

fn repair_metadata(root: &mut Map<String, Value>, default_title: &str, participants: &[String]) {
    let metadata = root
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if !metadata.is_object() {
        *metadata = json!({"participants": participants});
    }
    let Some(metadata) = metadata.as_object_mut() else {
        return;
    };

    let title_ok = metadata
        .get("title")
        .and_then(Value::as_str)
        .is_some_and(|t| !t.trim().is_empty());
    if !title_ok {
        metadata.insert("title".to_string(), Value::String(default_title.to_string()));
    }

    let names: Vec<Value> = match metadata.get("participants") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|n| Value::String(n.to_string()))
            .collect(),
        _ => Vec::new(),
    };
    metadata.insert("participants".to_string(), Value::Array(names));
}

fn repair_tasks(root: &mut Map<String, Value>) {
    let items = match root.remove("tasks_and_objectives") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    let fixed: Vec<Value> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let description = item
                .get("description")
                .map(value_to_string)
                .unwrap_or_default()
                .trim()
                .to_string();
            let mut task = item
                .get("task")
                .map(value_to_string)
                .unwrap_or_default()
                .trim()
                .to_string();
            if task.is_empty() && !description.is_empty() {
                task = synthesize_task(&description);
            }
            if task.is_empty() {
                return None;
            }
            Some(json!({"task": task, "description": description}))
        })
        .collect();

    root.insert("tasks_and_objectives".to_string(), Value::Array(fixed));
}

/// First 80 characters of the description, with an ellipsis when cut
fn synthesize_task(description: &str) -> String {
    if description.chars().count() <= SYNTHESIZED_TASK_CHARS {
        return description.to_string();
    }
    let head: String = description.chars().take(SYNTHESIZED_TASK_CHARS).collect();
    format!("{}…", head)
}

/// Canonical id → item mapping from either a mapping or a list of items
fn details_to_map(details: Value) -> Map<String, Value> {
    match details {
        Value::Object(map) => map,
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, item)| item.is_object())
            .map(|(idx, item)| {
                let id = match item.get("id") {
                    Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => format!("item_{}", idx),
                };
                (id, item)
            })
            .collect(),
        _ => Map::new(),
    }
}

fn repair_detail_item(item: &mut Value) {
    if !item.is_object() {
        *item = json!({"title": "", "content": value_to_string(item), "key_timestamps": []});
    }
    let Some(obj) = item.as_object_mut() else {
        return;
    };

    obj.remove("id");
    obj.entry("title").or_insert_with(|| Value::String(String::new()));
    repair_content(obj);

    let citations = match obj.remove("key_timestamps") {
        Some(Value::Array(entries)) => entries.iter().map(repair_citation).collect(),
        _ => Vec::new(),
    };
    obj.insert("key_timestamps".to_string(), Value::Array(citations));

    if !obj.get("start_time").is_some_and(Value::is_string) {
        obj.remove("start_time");
    }
}

/// Content must be one newline-joined string, even if sent as a list of lines
fn repair_content(obj: &mut Map<String, Value>) {
    let content = match obj.remove("content") {
        Some(Value::Array(lines)) => lines
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(other) => value_to_string(&other),
        None => String::new(),
    };
    obj.insert("content".to_string(), Value::String(content));
}

fn repair_citation(entry: &Value) -> Value {
    match entry {
        Value::Object(obj) => {
            let time = obj.get("time").and_then(Value::as_str);
            let description = obj
                .get("description")
                .map(value_to_string)
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| time.unwrap_or_default().to_string());
            json!({"description": description, "time": time})
        }
        other => json!({"description": value_to_string(other), "time": null}),
    }
}
