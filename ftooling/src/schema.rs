//! Tool descriptors and the input schema each server declares per tool.
//!
//! ```rust
//! use ftooling::{FieldKind, ToolDescriptor};
//!
//! let tool = ToolDescriptor::new("read_file", "Read a file from disk")
//!     .with_required_field("path", FieldKind::String, "Path to read")
//!     .with_optional_field("encoding", FieldKind::String, "Text encoding")
//!     .with_category("filesystem");
//!
//! assert_eq!(tool.input_schema.required, vec!["path".to_string()]);
//! assert!(tool.input_schema.declares("encoding"));
//! assert_eq!(tool.category.as_deref(), Some("filesystem"));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Any,
    String,
    Number,
    Boolean,
    Object,
    Array,
}

impl FieldKind {
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::Any => true,
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::Object => value.is_object(),
            FieldKind::Array => value.is_array(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldContract {
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub description: String,
}

impl FieldContract {
    pub fn new(kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, FieldContract>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_required(mut self, name: impl Into<String>, contract: FieldContract) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, contract);
        self
    }

    pub fn with_optional(mut self, name: impl Into<String>, contract: FieldContract) -> Self {
        self.properties.insert(name.into(), contract);
        self
    }

    pub fn declares(&self, field: &str) -> bool {
        self.properties.contains_key(field)
    }

    pub fn field(&self, field: &str) -> Option<&FieldContract> {
        self.properties.get(field)
    }
}

/// Category reported for tools that declare none.
pub const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub input_schema: InputSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: InputSchema::default(),
            output_schema: None,
            category: None,
        }
    }

    pub fn with_input_schema(mut self, input_schema: InputSchema) -> Self {
        self.input_schema = input_schema;
        self
    }

    pub fn with_required_field(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Self {
        self.input_schema = self
            .input_schema
            .with_required(name, FieldContract::new(kind, description));
        self
    }

    pub fn with_optional_field(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        description: impl Into<String>,
    ) -> Self {
        self.input_schema = self
            .input_schema
            .with_optional(name, FieldContract::new(kind, description));
        self
    }

    pub fn with_output_schema(mut self, output_schema: Value) -> Self {
        self.output_schema = Some(output_schema);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(UNCATEGORIZED)
    }

    /// Lowercased `"<name> <description>"`, the text keyword matching runs against.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name, self.description).to_lowercase()
    }

    pub fn matches_query(&self, query: &str) -> bool {
        self.search_text().contains(&query.to_lowercase())
    }
}
