//! Gateway hooks for registration and dispatch lifecycle events.
//!
//! ```rust
//! use fgateway::{GatewayHooks, NoopGatewayHooks};
//!
//! fn assert_hooks_trait(_hooks: &dyn GatewayHooks) {}
//!
//! let hooks = NoopGatewayHooks;
//! assert_hooks_trait(&hooks);
//! ```

use std::time::Duration;

use ftooling::{ToolError, ToolRequest, ToolResponse};

use crate::ServerStatus;

pub trait GatewayHooks: Send + Sync {
    fn on_server_registered(&self, _server: &ServerStatus) {}

    fn on_server_unregistered(&self, _server_name: &str) {}

    fn on_server_shutdown_failure(&self, _server_name: &str, _error: &ToolError) {}

    fn on_dispatch_start(&self, _request: &ToolRequest, _server_name: &str) {}

    fn on_dispatch_success(
        &self,
        _request: &ToolRequest,
        _server_name: &str,
        _response: &ToolResponse,
        _elapsed: Duration,
    ) {
    }

    /// `server_name` is `None` when the request never reached a server.
    fn on_dispatch_failure(
        &self,
        _request: &ToolRequest,
        _server_name: Option<&str>,
        _response: &ToolResponse,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGatewayHooks;

impl GatewayHooks for NoopGatewayHooks {}
