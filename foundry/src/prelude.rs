//! Common imports for most foundry applications.

pub use crate::{
    auth, build_tooling, build_tooling_with, build_tooling_with_hooks, context_at_hour,
    input_from_value, parse_time_of_day, request, user_request,
};
pub use crate::{tool_input, tool_request};
pub use crate::{
    AuthContext, BoxFuture, ChainCatalog, ExecutionPlan, FieldKind, FunctionToolServer, Gateway,
    GatewayClient, GatewayConfig, GatewayHooks, SelectionContext, SessionId, TimeOfDay,
    ToolDescriptor, ToolError, ToolErrorKind, ToolFuture, ToolInput, ToolPlanner, ToolRequest,
    ToolResponse, ToolSelector, ToolServer, ToolingBundle, UserId,
};
