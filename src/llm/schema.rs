use serde::Serialize;
use serde_json::json;

pub const SUMMARY_TOOL_NAME: &str = "format_meeting_summary";
pub const MINUTES_TOOL_NAME: &str = "format_meeting_minutes";

/// A tool the model is forced to call, carrying the output schema
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

fn topic_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "id": {"type": "string"},
            "title": {"type": "string"},
            "time": {"type": "string", "description": "MM:SS"}
        },
        "required": ["id", "title"]
    })
}

fn action_item_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "task": {"type": "string", "description": "Short title of the task or objective"},
            "description": {"type": "string"}
        },
        "required": ["task"]
    })
}

fn metadata_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "title": {"type": "string"},
            "participants": {"type": "array", "items": {"type": "string"}}
        },
        "required": ["title"]
    })
}

/// Output contract of one chunked partial summary
pub fn summary_tool() -> ToolSpec {
    ToolSpec {
        name: SUMMARY_TOOL_NAME.to_string(),
        description: "Formats the meeting transcript into a structured summary.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "metadata": metadata_schema(),
                "main_points": {"type": "array", "items": topic_schema()},
                "detailed_summary": {
                    "type": "object",
                    "description": "Keyed by main_points id",
                    "additionalProperties": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "content": {
                                "type": "string",
                                "description": "Bullet lines starting with '- ' separated by newlines"
                            },
                            "key_timestamps": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "description": {"type": "string"},
                                        "time": {"type": "string", "description": "MM:SS"}
                                    },
                                    "required": ["description"]
                                }
                            },
                            "start_time": {"type": "string", "description": "MM:SS"}
                        },
                        "required": ["title", "content", "key_timestamps"]
                    }
                },
                "tasks_and_objectives": {"type": "array", "items": action_item_schema()}
            },
            "required": ["metadata", "main_points"]
        }),
    }
}

/// Output contract of the one-shot minutes
pub fn minutes_tool() -> ToolSpec {
    ToolSpec {
        name: MINUTES_TOOL_NAME.to_string(),
        description: "Formats the meeting transcript into complete meeting minutes.".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "objective": {"type": "string"},
                "metadata": metadata_schema(),
                "main_points": {"type": "array", "items": topic_schema()},
                "details": {
                    "type": "object",
                    "description": "Keyed by main_points id",
                    "additionalProperties": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "content": {"type": "string"}
                        },
                        "required": ["title", "content"]
                    }
                },
                "tasks_and_objectives": {"type": "array", "items": action_item_schema()}
            },
            "required": ["objective", "metadata", "main_points", "details", "tasks_and_objectives"]
        }),
    }
}
