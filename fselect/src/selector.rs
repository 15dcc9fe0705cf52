//! Usage-aware scoring of catalog tools against a free-text task.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use fcommon::duration_ms;
use ftooling::{ToolDescriptor, ToolInput};
use serde::{Deserialize, Serialize};

use crate::{KeywordTable, SelectionContext, ToolUsagePattern};

pub const KEYWORD_WEIGHT: f64 = 0.3;
pub const SUCCESS_WEIGHT: f64 = 0.2;
pub const FREQUENCY_CAP: f64 = 0.2;
pub const CONTEXT_WEIGHT: f64 = 0.2;
/// A candidate is only returned when its score is strictly above this.
pub const SELECTION_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTool {
    pub tool: ToolDescriptor,
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStats {
    pub total_tools_used: usize,
    pub most_used_tool: Option<String>,
    pub average_success_rate: f64,
    pub tools_by_category: BTreeMap<String, usize>,
}

#[derive(Debug, Default)]
pub struct ToolSelector {
    keywords: KeywordTable,
    patterns: Mutex<BTreeMap<String, ToolUsagePattern>>,
    categories: Mutex<BTreeMap<String, String>>,
}

impl ToolSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(keywords: KeywordTable) -> Self {
        Self {
            keywords,
            ..Self::default()
        }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    pub fn extract_keywords(&self, description: &str) -> Vec<String> {
        self.keywords.extract(description)
    }

    /// Remembers the category of every tool in `catalog` for [`Self::tool_stats`].
    pub fn observe_catalog(&self, catalog: &[ToolDescriptor]) {
        let mut categories = self.lock_categories();
        for tool in catalog {
            categories.insert(tool.name.clone(), tool.category_or_default().to_string());
        }
    }

    /// Scores every candidate in catalog order.
    pub fn rank_tools(
        &self,
        description: &str,
        context: &SelectionContext,
        catalog: &[ToolDescriptor],
    ) -> Vec<ScoredTool> {
        let keywords = self.extract_keywords(description);
        let patterns = self.lock_patterns();

        catalog
            .iter()
            .map(|tool| {
                let text = tool.search_text();
                let matched_keywords: Vec<String> = keywords
                    .iter()
                    .filter(|keyword| text.contains(keyword.as_str()))
                    .cloned()
                    .collect();

                let mut score = KEYWORD_WEIGHT * matched_keywords.len() as f64;
                if let Some(pattern) = patterns.get(&tool.name) {
                    score += SUCCESS_WEIGHT * pattern.success_rate;
                    score += FREQUENCY_CAP.min(pattern.frequency as f64 / 100.0);
                }
                if context.hint_matches(&text) {
                    score += CONTEXT_WEIGHT;
                }

                ScoredTool {
                    tool: tool.clone(),
                    score: score.min(1.0),
                    matched_keywords,
                }
            })
            .collect()
    }

    /// Picks the highest scoring tool, earliest in catalog order on ties.
    pub fn select_tool(
        &self,
        description: &str,
        context: &SelectionContext,
        catalog: &[ToolDescriptor],
    ) -> Option<ScoredTool> {
        let mut best: Option<ScoredTool> = None;
        for candidate in self.rank_tools(description, context, catalog) {
            let better = best
                .as_ref()
                .is_none_or(|current| candidate.score > current.score);
            if better {
                best = Some(candidate);
            }
        }
        best.filter(|candidate| candidate.score > SELECTION_THRESHOLD)
    }

    pub fn record_tool_usage(
        &self,
        tool_name: &str,
        duration: Duration,
        success: bool,
        params: &ToolInput,
        context: &SelectionContext,
    ) {
        let elapsed_ms = duration_ms(duration);
        let parameter_keys: Vec<String> = params.keys().cloned().collect();
        let mut patterns = self.lock_patterns();

        match patterns.get_mut(tool_name) {
            Some(pattern) => pattern.observe(elapsed_ms, success, &parameter_keys, context),
            None => {
                let pattern = ToolUsagePattern::first(
                    tool_name,
                    elapsed_ms,
                    success,
                    &parameter_keys,
                    context,
                );
                patterns.insert(tool_name.to_string(), pattern);
            }
        }
    }

    pub fn usage_pattern(&self, tool_name: &str) -> Option<ToolUsagePattern> {
        self.lock_patterns().get(tool_name).cloned()
    }

    pub fn tool_stats(&self) -> ToolStats {
        let patterns = self.lock_patterns();
        let categories = self.lock_categories();

        let mut most_used: Option<&ToolUsagePattern> = None;
        for pattern in patterns.values() {
            if most_used.is_none_or(|current| pattern.frequency > current.frequency) {
                most_used = Some(pattern);
            }
        }

        let average_success_rate = if patterns.is_empty() {
            0.0
        } else {
            patterns.values().map(|pattern| pattern.success_rate).sum::<f64>()
                / patterns.len() as f64
        };

        let mut tools_by_category = BTreeMap::<String, usize>::new();
        for name in patterns.keys() {
            let category = categories
                .get(name)
                .map(String::as_str)
                .unwrap_or(ftooling::UNCATEGORIZED);
            *tools_by_category.entry(category.to_string()).or_default() += 1;
        }

        ToolStats {
            total_tools_used: patterns.len(),
            most_used_tool: most_used.map(|pattern| pattern.tool_name.clone()),
            average_success_rate,
            tools_by_category,
        }
    }

    fn lock_patterns(&self) -> MutexGuard<'_, BTreeMap<String, ToolUsagePattern>> {
        self.patterns.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_categories(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.categories.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn catalog() -> Vec<ToolDescriptor> {
        vec![
            ToolDescriptor::new("read_file", "Read the contents of a file")
                .with_category("filesystem"),
            ToolDescriptor::new("write_file", "Write content to a file")
                .with_category("filesystem"),
            ToolDescriptor::new("run_command", "Execute a shell command (exec)"),
            ToolDescriptor::new("git_commit", "Create a git commit").with_category("git"),
        ]
    }

    fn params(value: serde_json::Value) -> ToolInput {
        value.as_object().cloned().expect("object params")
    }

    #[test]
    fn unrelated_description_selects_nothing() {
        let selector = ToolSelector::new();

        let selected = selector.select_tool(
            "sing a lullaby to the moon",
            &SelectionContext::new(),
            &catalog(),
        );

        assert!(selected.is_none());
        assert!(
            selector
                .rank_tools("sing a lullaby", &SelectionContext::new(), &catalog())
                .iter()
                .all(|candidate| candidate.score <= SELECTION_THRESHOLD)
        );
    }

    #[test]
    fn a_single_keyword_sits_exactly_on_the_threshold() {
        let selector = ToolSelector::new();
        let context = SelectionContext::new();

        let ranked = selector.rank_tools("please read it", &context, &catalog());
        assert!((ranked[0].score - KEYWORD_WEIGHT).abs() < 1e-9);
        assert!(selector.select_tool("please read it", &context, &catalog()).is_none());
    }

    #[test]
    fn context_hint_lifts_a_keyword_match_over_the_threshold() {
        let selector = ToolSelector::new();
        let context = SelectionContext::new().with_recent_app("git");

        let selected = selector
            .select_tool("commit my work", &context, &catalog())
            .expect("git_commit should be selected");

        assert_eq!(selected.tool.name, "git_commit");
        assert_eq!(selected.matched_keywords, vec!["git"]);
        assert!((selected.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ties_resolve_to_catalog_order() {
        let selector = ToolSelector::new();
        let context = SelectionContext::new().with_recent_app("file");

        let selected = selector
            .select_tool("open and save the file", &context, &catalog())
            .expect("tie should still select");

        assert_eq!(selected.tool.name, "read_file");
    }

    #[test]
    fn recorded_success_raises_future_scores() {
        let selector = ToolSelector::new();
        let context = SelectionContext::new().with_hour(9);

        for _ in 0..3 {
            selector.record_tool_usage(
                "read_file",
                Duration::from_millis(40),
                true,
                &params(json!({"path": "a.txt"})),
                &context,
            );
        }

        let selected = selector
            .select_tool("read it", &SelectionContext::new(), &catalog())
            .expect("usage history should lift read_file");
        assert_eq!(selected.tool.name, "read_file");
        assert!((selected.score - (0.3 + 0.2 + 0.03)).abs() < 1e-9);

        let pattern = selector.usage_pattern("read_file").expect("pattern");
        assert_eq!(pattern.frequency, 3);
        assert_eq!(pattern.parameter_keys, vec!["path"]);
        assert_eq!(pattern.contexts, vec!["morning"]);
    }

    #[test]
    fn scores_are_capped_at_one() {
        let selector = ToolSelector::with_keywords(
            KeywordTable::empty()
                .with_rule("a", r"\balpha\b")
                .and_then(|table| table.with_rule("b", r"\bbeta\b"))
                .and_then(|table| table.with_rule("c", r"\bgamma\b"))
                .and_then(|table| table.with_rule("d", r"\bdelta\b"))
                .expect("valid rules"),
        );
        let catalog = vec![ToolDescriptor::new("abcd", "letters")];

        let selected = selector
            .select_tool("alpha beta gamma delta", &SelectionContext::new(), &catalog)
            .expect("selected");

        assert_eq!(selected.score, 1.0);
    }

    #[test]
    fn stats_summarize_usage_by_category() {
        let selector = ToolSelector::new();
        let context = SelectionContext::new();
        selector.observe_catalog(&catalog());

        let none = ToolInput::new();
        let tick = Duration::from_millis(5);
        selector.record_tool_usage("read_file", tick, true, &none, &context);
        selector.record_tool_usage("read_file", tick, true, &none, &context);
        selector.record_tool_usage("run_command", tick, false, &none, &context);
        selector.record_tool_usage("mystery", tick, true, &none, &context);

        let stats = selector.tool_stats();

        assert_eq!(stats.total_tools_used, 3);
        assert_eq!(stats.most_used_tool.as_deref(), Some("read_file"));
        assert!((stats.average_success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.tools_by_category.get("filesystem"), Some(&1));
        assert_eq!(stats.tools_by_category.get(ftooling::UNCATEGORIZED), Some(&2));
    }

    #[test]
    fn empty_history_has_neutral_stats() {
        let stats = ToolSelector::new().tool_stats();

        assert_eq!(stats.total_tools_used, 0);
        assert_eq!(stats.most_used_tool, None);
        assert_eq!(stats.average_success_rate, 0.0);
        assert!(stats.tools_by_category.is_empty());
    }
}
