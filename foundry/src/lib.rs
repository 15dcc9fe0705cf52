//! Unified facade over the foundry workspace crates.
//!
//! This crate is designed to be the single dependency for most applications.
//! It re-exports the tool contract, gateway, selector, and planner crates and
//! provides wiring helpers and macros for common setup and request-building flows.

mod macros;

pub mod prelude;
pub mod runtime;
pub mod util;

pub use fcommon;
pub use fgateway;
#[cfg(feature = "observability")]
pub use fobserve;
pub use fplan;
pub use fselect;
pub use ftooling;
pub use serde_json;

pub use fcommon::{BoxFuture, OrderedRegistry, SessionId, UserId};
pub use fgateway::{
    AuthContext, Gateway, GatewayBuilder, GatewayClient, GatewayConfig, GatewayHooks,
    GatewayStats, LogEntry, NoopGatewayHooks, RequestLog, RoutedTool, ServerStats, ServerStatus,
};
#[cfg(feature = "observability")]
pub use fobserve::{MetricsObservabilityHooks, SafeGatewayHooks, TracingObservabilityHooks};
pub use fplan::{ChainCatalog, ChainStepResult, ChainSuggestion, ExecutionPlan, ToolPlanner};
pub use fselect::{
    KeywordTable, ScoredTool, SelectionContext, TimeOfDay, ToolSelector, ToolStats,
    ToolUsagePattern, extract_keywords,
};
pub use ftooling::{
    FieldContract, FieldKind, FunctionToolServer, FunctionToolServerBuilder, InputSchema,
    ServerState, ToolDescriptor, ToolError, ToolErrorKind, ToolFuture, ToolInput, ToolRequest,
    ToolResponse, ToolServer, UNCATEGORIZED, validate_input,
};

#[cfg(feature = "observability")]
pub use runtime::build_observed_tooling;
pub use runtime::{ToolingBundle, build_tooling, build_tooling_with, build_tooling_with_hooks};
pub use util::{auth, context_at_hour, input_from_value, parse_time_of_day, request, user_request};
