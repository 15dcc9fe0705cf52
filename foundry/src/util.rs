//! Small convenience constructors for common types.

use serde_json::Value;

use crate::{AuthContext, SelectionContext, TimeOfDay, ToolError, ToolInput, ToolRequest};

/// Converts a JSON object into tool input. Any other JSON value is rejected.
pub fn input_from_value(value: Value) -> Result<ToolInput, ToolError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ToolError::validation(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

pub fn request(tool: impl Into<String>, input: ToolInput) -> ToolRequest {
    ToolRequest::new(tool, input)
}

pub fn user_request(
    tool: impl Into<String>,
    input: ToolInput,
    user_id: &str,
    session_id: &str,
) -> ToolRequest {
    ToolRequest::new(tool, input)
        .with_user(user_id)
        .with_session(session_id)
}

pub fn auth(user_id: &str, session_id: &str) -> AuthContext {
    AuthContext::new(user_id, session_id)
}

pub fn context_at_hour(hour: u8) -> SelectionContext {
    SelectionContext::new().with_hour(hour)
}

pub fn parse_time_of_day(value: &str) -> Option<TimeOfDay> {
    match value.trim().to_ascii_lowercase().as_str() {
        "morning" | "am" => Some(TimeOfDay::Morning),
        "afternoon" | "midday" | "noon" => Some(TimeOfDay::Afternoon),
        "evening" | "pm" => Some(TimeOfDay::Evening),
        "night" | "late" => Some(TimeOfDay::Night),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
