//! Keyword extraction over a fixed table of case-insensitive patterns.
//!
//! ```rust
//! use fselect::{KeywordTable, tags};
//!
//! let table = KeywordTable::standard();
//! let keywords = table.extract("Open the config and COMMIT it");
//!
//! assert_eq!(keywords, vec![tags::READ.to_string(), tags::GIT.to_string()]);
//! ```

use std::sync::LazyLock;

use ftooling::ToolError;
use regex::{Regex, RegexBuilder};

pub mod tags {
    pub const READ: &str = "read";
    pub const WRITE: &str = "write";
    pub const EDIT: &str = "edit";
    pub const DELETE: &str = "delete";
    pub const LIST: &str = "list";
    pub const SEARCH: &str = "search";
    pub const EXEC: &str = "exec";
    pub const TEST: &str = "test";
    pub const ANALYZE: &str = "analyze";
    pub const SUGGEST: &str = "suggest";
    pub const LINT: &str = "lint";
    pub const GIT: &str = "git";
    pub const PUSH: &str = "push";
    pub const FETCH: &str = "fetch";
    pub const EMULATE: &str = "emulate";
}

const STANDARD_RULES: &[(&str, &str)] = &[
    (tags::READ, r"\b(read|view|open|show|display|cat|load)\b"),
    (tags::WRITE, r"\b(write|create|save|generate)\b"),
    (tags::EDIT, r"\b(edit|modify|change|update|fix|refactor|rename)\b"),
    (tags::DELETE, r"\b(delete|remove|rm|erase)\b"),
    (tags::LIST, r"\b(list|ls|director(y|ies)|folders?)\b"),
    (tags::SEARCH, r"\b(search|find|grep|locate|look\s+for)\b"),
    (tags::EXEC, r"\b(run|execute|exec|shell|command|launch)\b"),
    (tags::TEST, r"\b(test|tests|testing|verify)\b"),
    (tags::ANALYZE, r"\b(analy[sz]e|analysis|review|inspect|explain|understand)\b"),
    (tags::SUGGEST, r"\b(suggest|suggestions?|improve|recommend|optimi[sz]e)\b"),
    (tags::LINT, r"\b(lint|linter|format|style|clippy)\b"),
    (tags::GIT, r"\b(git|commit|push|pull|branch|merge)\b"),
    (tags::PUSH, r"\b(push|publish|deploy)\b"),
    (tags::FETCH, r"\b(fetch|download|http|url|web)\b"),
    (tags::EMULATE, r"\b(emulat\w*|cpu|6502|rom|assembly)\b"),
];

static STANDARD: LazyLock<KeywordTable> = LazyLock::new(|| {
    let rules = STANDARD_RULES
        .iter()
        .map(|(tag, pattern)| KeywordRule {
            tag: (*tag).to_string(),
            pattern: compile(pattern).expect("valid regex"),
        })
        .collect();
    KeywordTable { rules }
});

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[derive(Debug, Clone)]
struct KeywordRule {
    tag: String,
    pattern: Regex,
}

/// Ordered `pattern -> tag` rules. Extraction reports tags in table order.
#[derive(Debug, Clone)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl KeywordTable {
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Appends a rule. Patterns are matched case-insensitively.
    pub fn with_rule(mut self, tag: impl Into<String>, pattern: &str) -> Result<Self, ToolError> {
        let pattern = compile(pattern).map_err(|err| {
            ToolError::configuration(format!("invalid keyword pattern '{pattern}': {err}"))
        })?;
        self.rules.push(KeywordRule {
            tag: tag.into(),
            pattern,
        });
        Ok(self)
    }

    pub fn extract(&self, description: &str) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();
        for rule in &self.rules {
            if rule.pattern.is_match(description) && !keywords.contains(&rule.tag) {
                keywords.push(rule.tag.clone());
            }
        }
        keywords
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.tag.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
