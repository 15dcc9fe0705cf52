//! Tracing-based observability hooks for gateway registration and dispatch.
//!
//! ```rust
//! use fgateway::GatewayHooks;
//! use fobserve::TracingObservabilityHooks;
//!
//! fn accepts_gateway_hooks(_hooks: &dyn GatewayHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_gateway_hooks(&hooks);
//! ```

use std::time::Duration;

use fcommon::duration_ms;
use fgateway::{GatewayHooks, ServerStatus};
use ftooling::{ToolError, ToolRequest, ToolResponse};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl GatewayHooks for TracingObservabilityHooks {
    fn on_server_registered(&self, server: &ServerStatus) {
        tracing::info!(
            phase = "gateway",
            event = "server_registered",
            server_name = server.name,
            server_version = server.version,
            tool_count = server.tool_count
        );
    }

    fn on_server_unregistered(&self, server_name: &str) {
        tracing::info!(phase = "gateway", event = "server_unregistered", server_name);
    }

    fn on_server_shutdown_failure(&self, server_name: &str, error: &ToolError) {
        tracing::error!(
            phase = "gateway",
            event = "server_shutdown_failure",
            server_name,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_dispatch_start(&self, request: &ToolRequest, server_name: &str) {
        tracing::info!(
            phase = "gateway",
            event = "dispatch_start",
            tool_name = request.tool,
            server_name,
            user_id = request.user_id.as_ref().map(|id| id.as_str()),
            session_id = request.session_id.as_ref().map(|id| id.as_str())
        );
    }

    fn on_dispatch_success(
        &self,
        request: &ToolRequest,
        server_name: &str,
        _response: &ToolResponse,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "gateway",
            event = "dispatch_success",
            tool_name = request.tool,
            server_name,
            user_id = request.user_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = duration_ms(elapsed)
        );
    }

    fn on_dispatch_failure(
        &self,
        request: &ToolRequest,
        server_name: Option<&str>,
        response: &ToolResponse,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "gateway",
            event = "dispatch_failure",
            tool_name = request.tool,
            server_name,
            user_id = request.user_id.as_ref().map(|id| id.as_str()),
            elapsed_ms = duration_ms(elapsed),
            error_kind = ?response.error_kind(),
            error = response.error()
        );
    }
}
