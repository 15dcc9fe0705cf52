//! Metrics-based observability hooks for gateway registration and dispatch.
//!
//! ```rust
//! use fgateway::GatewayHooks;
//! use fobserve::MetricsObservabilityHooks;
//!
//! fn accepts_gateway_hooks(_hooks: &dyn GatewayHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_gateway_hooks(&hooks);
//! ```

use std::time::Duration;

use fgateway::{GatewayHooks, ServerStatus};
use ftooling::{ToolError, ToolRequest, ToolResponse};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl GatewayHooks for MetricsObservabilityHooks {
    fn on_server_registered(&self, server: &ServerStatus) {
        metrics::counter!(
            "foundry_gateway_server_registered_total",
            "server" => server.name.clone()
        )
        .increment(1);
        metrics::gauge!(
            "foundry_gateway_server_tools",
            "server" => server.name.clone()
        )
        .set(server.tool_count as f64);
    }

    fn on_server_unregistered(&self, server_name: &str) {
        metrics::counter!(
            "foundry_gateway_server_unregistered_total",
            "server" => server_name.to_string()
        )
        .increment(1);
        metrics::gauge!(
            "foundry_gateway_server_tools",
            "server" => server_name.to_string()
        )
        .set(0.0);
    }

    fn on_server_shutdown_failure(&self, server_name: &str, error: &ToolError) {
        metrics::counter!(
            "foundry_gateway_server_shutdown_failure_total",
            "server" => server_name.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_dispatch_start(&self, request: &ToolRequest, server_name: &str) {
        metrics::counter!(
            "foundry_gateway_dispatch_start_total",
            "tool" => request.tool.clone(),
            "server" => server_name.to_string()
        )
        .increment(1);
    }

    fn on_dispatch_success(
        &self,
        request: &ToolRequest,
        server_name: &str,
        _response: &ToolResponse,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "foundry_gateway_dispatch_success_total",
            "tool" => request.tool.clone(),
            "server" => server_name.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "foundry_gateway_dispatch_latency_seconds",
            "tool" => request.tool.clone(),
            "outcome" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_dispatch_failure(
        &self,
        request: &ToolRequest,
        server_name: Option<&str>,
        response: &ToolResponse,
        elapsed: Duration,
    ) {
        let error_kind = response
            .error_kind()
            .map(|kind| format!("{kind:?}"))
            .unwrap_or_else(|| "Unknown".to_string());
        metrics::counter!(
            "foundry_gateway_dispatch_failure_total",
            "tool" => request.tool.clone(),
            "server" => server_name.unwrap_or("none").to_string(),
            "error_kind" => error_kind
        )
        .increment(1);
        metrics::histogram!(
            "foundry_gateway_dispatch_latency_seconds",
            "tool" => request.tool.clone(),
            "outcome" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
