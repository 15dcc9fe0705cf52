//! Input validation against a tool's declared schema.
//!
//! ```rust
//! use ftooling::{FieldKind, ToolDescriptor, ToolInput, validate_input};
//! use serde_json::json;
//!
//! let tool = ToolDescriptor::new("echo", "Echo a message")
//!     .with_required_field("message", FieldKind::String, "Text to echo");
//!
//! let mut input = ToolInput::new();
//! input.insert("message".to_string(), json!("hi"));
//! assert!(validate_input(&tool.input_schema, &input).is_ok());
//!
//! let error = validate_input(&tool.input_schema, &ToolInput::new()).expect_err("missing field");
//! assert_eq!(error.message, "Invalid input: Missing required field: message");
//! ```

use serde_json::{Map, Value};

use crate::{InputSchema, ToolError, ToolInput};

/// Checks required fields, then undeclared fields, then declared field kinds.
pub fn validate_input(schema: &InputSchema, input: &ToolInput) -> Result<(), ToolError> {
    if let Some(missing) = schema
        .required
        .iter()
        .find(|field| !input.contains_key(field.as_str()))
    {
        return Err(ToolError::validation(format!(
            "Missing required field: {missing}"
        )));
    }

    for (field, value) in input {
        let contract = schema
            .field(field)
            .ok_or_else(|| ToolError::validation(format!("Unknown field: {field}")))?;

        if !contract.kind.matches(value) {
            return Err(ToolError::validation(format!(
                "Invalid type for field: {field} (expected {:?})",
                contract.kind
            )));
        }
    }

    Ok(())
}

pub fn parse_input(input_json: &str) -> Result<ToolInput, ToolError> {
    let value: Value = serde_json::from_str(input_json)
        .map_err(|err| ToolError::validation(format!("invalid JSON input: {err}")))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ToolError::validation("expected a JSON object")),
    }
}

pub fn required_str<'a>(input: &'a Map<String, Value>, key: &str) -> Result<&'a str, ToolError> {
    input
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ToolError::validation(format!("Missing required field: {key}")))
}
