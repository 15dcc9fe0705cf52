//! Tool server contract for registry-managed capabilities.
//!
//! A server declares a fixed tool list, owns its own setup and teardown, and
//! implements [`ToolServer::invoke`] for its business logic. The provided
//! [`ToolServer::execute_tool`] performs lookup and schema validation before
//! delegating, and always answers with a [`ToolResponse`].

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use fcommon::BoxFuture;
use futures_util::FutureExt;
use serde_json::Value;

use crate::{ServerState, ToolDescriptor, ToolError, ToolInput, ToolResponse, validate_input};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait ToolServer: Send + Sync {
    fn name(&self) -> &str;

    fn version(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn tools(&self) -> &[ToolDescriptor];

    /// Names of servers that must be registered and ready before this one.
    fn dependencies(&self) -> &[String] {
        &[]
    }

    fn state(&self) -> ServerState;

    /// Idempotent: only the first successful call performs setup.
    fn initialize<'a>(&'a self) -> ToolFuture<'a, Result<(), ToolError>>;

    /// Idempotent: calls after the first are no-ops.
    fn shutdown<'a>(&'a self) -> ToolFuture<'a, Result<(), ToolError>>;

    /// Business logic for an already-validated call.
    fn invoke<'a>(
        &'a self,
        tool: &'a ToolDescriptor,
        input: ToolInput,
    ) -> ToolFuture<'a, Result<Value, ToolError>>;

    fn find_tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools().iter().find(|tool| tool.name == name)
    }

    fn declares(&self, name: &str) -> bool {
        self.find_tool(name).is_some()
    }

    fn execute_tool<'a>(
        &'a self,
        name: &'a str,
        input: ToolInput,
    ) -> ToolFuture<'a, ToolResponse> {
        Box::pin(async move {
            let started = Instant::now();
            let result = self.run_tool(name, input).await;
            ToolResponse::from_result(result, started.elapsed())
        })
    }

    #[doc(hidden)]
    fn run_tool<'a>(
        &'a self,
        name: &'a str,
        input: ToolInput,
    ) -> ToolFuture<'a, Result<Value, ToolError>> {
        Box::pin(async move {
            let state = self.state();
            if !state.is_ready() {
                return Err(ToolError::execution(format!(
                    "Server '{}' is not ready ({state:?})",
                    self.name()
                ))
                .with_server_name(self.name()));
            }

            let tool = self.find_tool(name).ok_or_else(|| {
                ToolError::tool_not_found(format!(
                    "Tool '{name}' not found in server '{}'",
                    self.name()
                ))
                .with_server_name(self.name())
                .with_tool_name(name)
            })?;

            validate_input(&tool.input_schema, &input)
                .map_err(|error| error.with_tool_name(name))?;

            // Servers may run handler code eagerly inside `invoke`, so the call
            // itself has to happen under `catch_unwind`.
            let invocation = async move { self.invoke(tool, input).await };
            match std::panic::AssertUnwindSafe(invocation)
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(_) => Err(ToolError::execution(format!("tool '{name}' panicked"))
                    .with_tool_name(name)),
            }
        })
    }
}

/// Lifecycle state cell shared by server implementations.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: Mutex<ServerState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ServerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, state: ServerState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Moves to `ShuttingDown` unless a shutdown already started. Returns whether
    /// the caller owns the teardown.
    pub fn begin_shutdown(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            ServerState::ShuttingDown | ServerState::Shutdown => false,
            ServerState::Uninitialized | ServerState::Ready => {
                *state = ServerState::ShuttingDown;
                true
            }
        }
    }
}
