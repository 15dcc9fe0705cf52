use std::time::Duration;

use fselect::ScoredTool;
use ftooling::{ToolInput, ToolResponse};
use serde::{Deserialize, Serialize};

/// Fixed per-step cost used for plan estimates.
pub const STEP_COST: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSuggestion {
    pub name: String,
    pub confidence: f64,
}

/// One executed chain step. A failed step is always the last in its result list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainStepResult {
    pub tool: String,
    pub input: ToolInput,
    pub response: ToolResponse,
}

impl ChainStepResult {
    pub fn is_success(&self) -> bool {
        self.response.is_success()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub steps: Vec<ScoredTool>,
    pub rationale: String,
    pub estimated_duration: Duration,
}

impl ExecutionPlan {
    pub fn tool_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.tool.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
