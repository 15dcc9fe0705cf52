//! Named tool chains for common multi-step tasks.
//!
//! ```rust
//! use fplan::ChainCatalog;
//!
//! let chains = ChainCatalog::standard();
//!
//! let steps: Vec<&str> = chains
//!     .get("code_review")
//!     .map(|chain| chain.iter().map(String::as_str).collect())
//!     .unwrap_or_default();
//! assert_eq!(steps, ["read_file", "analyze_code", "suggest_improvements", "lint_code"]);
//! ```

use fcommon::OrderedRegistry;
use ftooling::ToolDescriptor;

pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const EDIT_FILE: &str = "edit_file";
pub const ANALYZE_CODE: &str = "analyze_code";
pub const SUGGEST_IMPROVEMENTS: &str = "suggest_improvements";
pub const LINT_CODE: &str = "lint_code";
pub const RUN_TESTS: &str = "run_tests";
pub const GIT_COMMIT: &str = "git_commit";
pub const GIT_PUSH: &str = "git_push";

const STANDARD_CHAINS: &[(&str, &[&str])] = &[
    (
        "code_review",
        &[READ_FILE, ANALYZE_CODE, SUGGEST_IMPROVEMENTS, LINT_CODE],
    ),
    ("bug_fix", &[READ_FILE, ANALYZE_CODE, EDIT_FILE, RUN_TESTS]),
    (
        "feature_development",
        &[READ_FILE, WRITE_FILE, EDIT_FILE, RUN_TESTS, GIT_COMMIT],
    ),
    (
        "refactor",
        &[READ_FILE, ANALYZE_CODE, EDIT_FILE, RUN_TESTS, LINT_CODE],
    ),
    ("deploy", &[RUN_TESTS, GIT_COMMIT, GIT_PUSH]),
    ("documentation", &[READ_FILE, ANALYZE_CODE, WRITE_FILE]),
];

#[derive(Debug, Clone)]
pub struct ChainCatalog {
    chains: OrderedRegistry<String, Vec<String>>,
}

impl Default for ChainCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ChainCatalog {
    pub fn standard() -> Self {
        STANDARD_CHAINS
            .iter()
            .fold(Self::empty(), |catalog, (name, tools)| {
                catalog.with_chain(*name, tools.iter().copied())
            })
    }

    pub fn empty() -> Self {
        Self {
            chains: OrderedRegistry::new(),
        }
    }

    /// Adds or replaces a chain. A replaced chain keeps its position.
    pub fn with_chain<I, S>(mut self, name: impl Into<String>, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, tools);
        self
    }

    pub fn insert<I, S>(&mut self, name: impl Into<String>, tools: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chains
            .insert(name.into(), tools.into_iter().map(Into::into).collect());
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.chains.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.chains.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.chains
            .iter()
            .map(|(name, tools)| (name.as_str(), tools.as_slice()))
    }

    /// Resolves a chain against `catalog`, skipping names the catalog lacks.
    pub fn resolve(&self, name: &str, catalog: &[ToolDescriptor]) -> Option<Vec<ToolDescriptor>> {
        let tools = self.get(name)?;
        Some(resolve_names(tools.iter().map(String::as_str), catalog))
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

pub(crate) fn resolve_names<'a>(
    names: impl IntoIterator<Item = &'a str>,
    catalog: &[ToolDescriptor],
) -> Vec<ToolDescriptor> {
    names
        .into_iter()
        .filter_map(|name| catalog.iter().find(|tool| tool.name == name).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_lists_every_named_chain_in_order() {
        let chains = ChainCatalog::standard();

        assert_eq!(
            chains.names().collect::<Vec<_>>(),
            vec![
                "code_review",
                "bug_fix",
                "feature_development",
                "refactor",
                "deploy",
                "documentation"
            ]
        );
        assert_eq!(
            chains.get("deploy"),
            Some(&[RUN_TESTS.to_string(), GIT_COMMIT.to_string(), GIT_PUSH.to_string()][..])
        );
    }

    #[test]
    fn resolve_skips_tools_missing_from_catalog() {
        let chains = ChainCatalog::standard();
        let catalog = vec![
            ToolDescriptor::new(LINT_CODE, "Lint source"),
            ToolDescriptor::new(READ_FILE, "Read a file"),
        ];

        let resolved = chains
            .resolve("code_review", &catalog)
            .expect("known chain");

        let names: Vec<&str> = resolved.iter().map(|tool| tool.name.as_str()).collect();
        assert_eq!(names, vec![READ_FILE, LINT_CODE]);
        assert!(chains.resolve("launch_rocket", &catalog).is_none());
    }

    #[test]
    fn custom_chains_replace_in_place() {
        let chains = ChainCatalog::empty()
            .with_chain("first", ["a"])
            .with_chain("second", ["b"])
            .with_chain("first", ["c", "d"]);

        assert_eq!(chains.len(), 2);
        assert_eq!(chains.names().next(), Some("first"));
        assert_eq!(chains.get("first").map(<[String]>::len), Some(2));
    }
}
