//! Chain building, chain execution, and execution planning over a gateway client.

use std::sync::{Arc, LazyLock};

use fgateway::GatewayClient;
use fselect::{SelectionContext, ToolSelector, tags};
use ftooling::{ToolDescriptor, ToolInput};
use regex::Regex;

use crate::catalog::{
    ANALYZE_CODE, EDIT_FILE, GIT_COMMIT, GIT_PUSH, READ_FILE, RUN_TESTS, resolve_names,
};
use crate::{ChainCatalog, ChainStepResult, ChainSuggestion, ExecutionPlan, STEP_COST};

static CLAUSE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+and\s+").expect("valid regex"));

/// Canonical custom-chain stages: any listed tag appends the stage tool.
const STAGES: &[(&[&str], &str)] = &[
    (&[tags::READ], READ_FILE),
    (&[tags::ANALYZE], ANALYZE_CODE),
    (&[tags::EDIT, tags::WRITE], EDIT_FILE),
    (&[tags::TEST], RUN_TESTS),
    (&[tags::GIT, tags::PUSH], GIT_COMMIT),
    (&[tags::PUSH], GIT_PUSH),
];

const NAME_MATCH_WEIGHT: f64 = 0.5;
const MEMBER_MATCH_WEIGHT: f64 = 0.5;

pub struct ToolPlanner {
    client: GatewayClient,
    selector: Arc<ToolSelector>,
    chains: ChainCatalog,
}

impl ToolPlanner {
    pub fn new(client: GatewayClient, selector: Arc<ToolSelector>) -> Self {
        Self {
            client,
            selector,
            chains: ChainCatalog::standard(),
        }
    }

    pub fn with_chains(mut self, chains: ChainCatalog) -> Self {
        self.chains = chains;
        self
    }

    pub fn chains(&self) -> &ChainCatalog {
        &self.chains
    }

    pub fn selector(&self) -> &Arc<ToolSelector> {
        &self.selector
    }

    pub fn client(&self) -> &GatewayClient {
        &self.client
    }

    /// Tools currently reachable through the gateway.
    pub fn catalog(&self) -> Vec<ToolDescriptor> {
        self.client.available_tools()
    }

    pub fn get_chain(&self, name: &str) -> Option<Vec<ToolDescriptor>> {
        self.chains.resolve(name, &self.catalog())
    }

    /// Appends stage tools in canonical order, regardless of keyword order in
    /// `description`. Falls back to the single best selector match when no
    /// stage applies.
    pub fn build_custom_chain(
        &self,
        description: &str,
        context: &SelectionContext,
    ) -> Vec<ToolDescriptor> {
        let keywords = self.selector.extract_keywords(description);
        let catalog = self.catalog();

        let stage_tools = STAGES.iter().filter_map(|(triggers, tool)| {
            triggers
                .iter()
                .any(|tag| keywords.iter().any(|keyword| keyword == tag))
                .then_some(*tool)
        });
        let chain = resolve_names(stage_tools, &catalog);
        if !chain.is_empty() {
            return chain;
        }

        self.selector
            .select_tool(description, context, &catalog)
            .map(|selected| vec![selected.tool])
            .unwrap_or_default()
    }

    pub fn suggest_chain(&self, description: &str) -> Option<ChainSuggestion> {
        let text = description.to_lowercase();
        let mut best: Option<ChainSuggestion> = None;

        for (name, tools) in self.chains.iter() {
            let mut confidence = 0.0;
            if mentions(&text, name) {
                confidence += NAME_MATCH_WEIGHT;
            }
            if !tools.is_empty() {
                let hits = tools.iter().filter(|tool| mentions(&text, tool)).count();
                confidence += MEMBER_MATCH_WEIGHT * hits as f64 / tools.len() as f64;
            }

            let better = best
                .as_ref()
                .is_none_or(|current| confidence > current.confidence);
            if confidence > 0.0 && better {
                best = Some(ChainSuggestion {
                    name: name.to_string(),
                    confidence: confidence.min(1.0),
                });
            }
        }
        best
    }

    /// Runs `tools` in order and stops after the first failed step.
    /// Steps without a matching entry in `params` run with empty input.
    pub async fn execute_chain<S>(
        &self,
        tools: &[S],
        params: &[ToolInput],
        context: &SelectionContext,
    ) -> Vec<ChainStepResult>
    where
        S: AsRef<str>,
    {
        self.selector.observe_catalog(&self.catalog());

        let mut results = Vec::with_capacity(tools.len());
        for (index, tool) in tools.iter().enumerate() {
            let tool = tool.as_ref();
            let input = params.get(index).cloned().unwrap_or_default();
            let response = self.client.execute_tool(tool, input.clone()).await;
            self.selector.record_tool_usage(
                tool,
                response.execution_time(),
                response.is_success(),
                &input,
                context,
            );

            let failed = !response.is_success();
            results.push(ChainStepResult {
                tool: tool.to_string(),
                input,
                response,
            });
            if failed {
                break;
            }
        }
        results
    }

    /// Picks a primary tool for the whole description, then one extra tool
    /// per further `and` clause, skipping tools already planned.
    pub fn plan_tool_execution(
        &self,
        description: &str,
        context: &SelectionContext,
    ) -> ExecutionPlan {
        let catalog = self.catalog();
        self.selector.observe_catalog(&catalog);

        let mut steps = Vec::new();
        let mut reasons = Vec::new();

        if let Some(primary) = self.selector.select_tool(description, context, &catalog) {
            reasons.push(format!(
                "primary tool '{}' matched [{}] (score {:.2})",
                primary.tool.name,
                primary.matched_keywords.join(", "),
                primary.score
            ));
            steps.push(primary);
        }

        for clause in CLAUSE_SPLIT.split(description).skip(1) {
            let Some(extra) = self.selector.select_tool(clause, context, &catalog) else {
                continue;
            };
            if steps.iter().any(|step| step.tool.name == extra.tool.name) {
                continue;
            }
            reasons.push(format!(
                "'{}' for \"{}\" (score {:.2})",
                extra.tool.name,
                clause.trim(),
                extra.score
            ));
            steps.push(extra);
        }

        let rationale = if reasons.is_empty() {
            "no catalog tool matched the task".to_string()
        } else {
            reasons.join("; ")
        };
        let estimated_duration = STEP_COST * steps.len() as u32;

        ExecutionPlan {
            steps,
            rationale,
            estimated_duration,
        }
    }
}

/// Matches `name` as written or with underscores read as spaces.
fn mentions(text: &str, name: &str) -> bool {
    let name = name.to_lowercase();
    text.contains(&name) || text.contains(&name.replace('_', " "))
}
