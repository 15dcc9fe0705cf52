//! Named tool chains, keyword-driven custom chains, chain execution, and plans.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fgateway::{Gateway, GatewayClient, GatewayConfig};
//! use fplan::ToolPlanner;
//! use fselect::ToolSelector;
//!
//! let gateway = Arc::new(Gateway::new(GatewayConfig::default()).expect("gateway"));
//! let planner = ToolPlanner::new(GatewayClient::new(gateway), Arc::new(ToolSelector::new()));
//!
//! let suggestion = planner.suggest_chain("time for a bug fix").expect("suggestion");
//! assert_eq!(suggestion.name, "bug_fix");
//! ```

mod catalog;
mod planner;
mod types;

pub mod prelude {
    pub use crate::{ChainCatalog, ChainStepResult, ChainSuggestion, ExecutionPlan, ToolPlanner};
}

pub use catalog::{
    ANALYZE_CODE, ChainCatalog, EDIT_FILE, GIT_COMMIT, GIT_PUSH, LINT_CODE, READ_FILE, RUN_TESTS,
    SUGGEST_IMPROVEMENTS, WRITE_FILE,
};
pub use planner::ToolPlanner;
pub use types::{ChainStepResult, ChainSuggestion, ExecutionPlan, STEP_COST};
