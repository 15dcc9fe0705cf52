//! Usage-aware tool selection: keyword extraction, usage patterns, and scoring.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use fselect::{SelectionContext, ToolSelector};
//! use ftooling::{ToolDescriptor, ToolInput};
//!
//! let catalog = vec![
//!     ToolDescriptor::new("read_file", "Read a file from disk"),
//!     ToolDescriptor::new("run_command", "Run a shell command"),
//! ];
//! let selector = ToolSelector::new();
//! let context = SelectionContext::new();
//!
//! assert!(selector.select_tool("read the notes", &context, &catalog).is_none());
//!
//! let input = ToolInput::new();
//! selector.record_tool_usage("read_file", Duration::from_millis(12), true, &input, &context);
//! let picked = selector
//!     .select_tool("read the notes", &context, &catalog)
//!     .expect("history lifts the match over the threshold");
//! assert_eq!(picked.tool.name, "read_file");
//! ```

mod context;
mod keywords;
mod selector;
mod usage;

pub mod prelude {
    pub use crate::{
        ScoredTool, SelectionContext, TimeOfDay, ToolSelector, ToolStats, ToolUsagePattern,
    };
}

pub use context::{SelectionContext, TimeOfDay};
pub use keywords::{KeywordTable, tags};
pub use selector::{
    CONTEXT_WEIGHT, FREQUENCY_CAP, KEYWORD_WEIGHT, SELECTION_THRESHOLD, SUCCESS_WEIGHT,
    ScoredTool, ToolSelector, ToolStats,
};
pub use usage::{MAX_PARAMETER_KEYS, ToolUsagePattern};

/// Extracts keyword tags with the standard table.
pub fn extract_keywords(description: &str) -> Vec<String> {
    KeywordTable::standard().extract(description)
}
