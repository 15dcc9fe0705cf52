use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use fgateway::{GatewayHooks, ServerStatus};
use ftooling::{ToolError, ToolRequest, ToolResponse};

/// Isolates the gateway from panicking hook implementations.
pub struct SafeGatewayHooks<H> {
    inner: H,
}

impl<H> SafeGatewayHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H> GatewayHooks for SafeGatewayHooks<H>
where
    H: GatewayHooks,
{
    fn on_server_registered(&self, server: &ServerStatus) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_server_registered(server)));
    }

    fn on_server_unregistered(&self, server_name: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_server_unregistered(server_name)
        }));
    }

    fn on_server_shutdown_failure(&self, server_name: &str, error: &ToolError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_server_shutdown_failure(server_name, error)
        }));
    }

    fn on_dispatch_start(&self, request: &ToolRequest, server_name: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_dispatch_start(request, server_name)
        }));
    }

    fn on_dispatch_success(
        &self,
        request: &ToolRequest,
        server_name: &str,
        response: &ToolResponse,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_dispatch_success(request, server_name, response, elapsed)
        }));
    }

    fn on_dispatch_failure(
        &self,
        request: &ToolRequest,
        server_name: Option<&str>,
        response: &ToolResponse,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_dispatch_failure(request, server_name, response, elapsed)
        }));
    }
}
