//! Closure-backed tool server.
//!
//! ```rust
//! use ftooling::{FieldKind, FunctionToolServer, ToolDescriptor, ToolServer};
//! use serde_json::Value;
//!
//! let server = FunctionToolServer::builder("echo-server", "1.0.0")
//!     .description("Echoes its input")
//!     .sync_tool(
//!         ToolDescriptor::new("echo", "Echo a message")
//!             .with_required_field("message", FieldKind::String, "Text to echo"),
//!         |input| Ok(Value::Object(input)),
//!     )
//!     .build();
//!
//! assert_eq!(server.name(), "echo-server");
//! assert!(server.declares("echo"));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::{
    Lifecycle, ServerState, ToolDescriptor, ToolError, ToolFuture, ToolInput, ToolServer,
};

type ToolHandler =
    dyn Fn(ToolInput) -> ToolFuture<'static, Result<Value, ToolError>> + Send + Sync;

type LifecycleHandler = dyn Fn() -> ToolFuture<'static, Result<(), ToolError>> + Send + Sync;

pub struct FunctionToolServer {
    name: String,
    version: String,
    description: String,
    tools: Vec<ToolDescriptor>,
    dependencies: Vec<String>,
    handlers: HashMap<String, Arc<ToolHandler>>,
    on_initialize: Option<Arc<LifecycleHandler>>,
    on_shutdown: Option<Arc<LifecycleHandler>>,
    lifecycle: Lifecycle,
}

impl FunctionToolServer {
    pub fn builder(
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> FunctionToolServerBuilder {
        FunctionToolServerBuilder::new(name, version)
    }
}

impl ToolServer for FunctionToolServer {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        &self.version
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    fn state(&self) -> ServerState {
        self.lifecycle.state()
    }

    fn initialize<'a>(&'a self) -> ToolFuture<'a, Result<(), ToolError>> {
        Box::pin(async move {
            if self.lifecycle.state() != ServerState::Uninitialized {
                return Ok(());
            }

            if let Some(on_initialize) = &self.on_initialize {
                on_initialize()
                    .await
                    .map_err(|error| {
                        ToolError::initialization(error.message).with_server_name(&self.name)
                    })?;
            }

            self.lifecycle.set(ServerState::Ready);
            Ok(())
        })
    }

    fn shutdown<'a>(&'a self) -> ToolFuture<'a, Result<(), ToolError>> {
        Box::pin(async move {
            if !self.lifecycle.begin_shutdown() {
                return Ok(());
            }

            let result = match &self.on_shutdown {
                Some(on_shutdown) => on_shutdown().await,
                None => Ok(()),
            };

            self.lifecycle.set(ServerState::Shutdown);
            result.map_err(|error| error.with_server_name(&self.name))
        })
    }

    fn invoke<'a>(
        &'a self,
        tool: &'a ToolDescriptor,
        input: ToolInput,
    ) -> ToolFuture<'a, Result<Value, ToolError>> {
        match self.handlers.get(&tool.name) {
            Some(handler) => handler(input),
            None => {
                let message = format!("no handler bound for tool '{}'", tool.name);
                Box::pin(async move { Err(ToolError::execution(message)) })
            }
        }
    }
}

pub struct FunctionToolServerBuilder {
    name: String,
    version: String,
    description: String,
    tools: Vec<ToolDescriptor>,
    dependencies: Vec<String>,
    handlers: HashMap<String, Arc<ToolHandler>>,
    on_initialize: Option<Arc<LifecycleHandler>>,
    on_shutdown: Option<Arc<LifecycleHandler>>,
}

impl FunctionToolServerBuilder {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            tools: Vec::new(),
            dependencies: Vec::new(),
            handlers: HashMap::new(),
            on_initialize: None,
            on_shutdown: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn depends_on(mut self, server_name: impl Into<String>) -> Self {
        let server_name = server_name.into();
        if !self.dependencies.contains(&server_name) {
            self.dependencies.push(server_name);
        }
        self
    }

    /// Declares `descriptor` and binds `handler` to it. Re-declaring a name
    /// replaces the earlier descriptor in place.
    pub fn tool<F, Fut>(mut self, descriptor: ToolDescriptor, handler: F) -> Self
    where
        F: Fn(ToolInput) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |input| -> ToolFuture<'static, Result<Value, ToolError>> {
                Box::pin(handler(input))
            });
        self.handlers.insert(descriptor.name.clone(), handler);

        match self
            .tools
            .iter_mut()
            .find(|existing| existing.name == descriptor.name)
        {
            Some(existing) => *existing = descriptor,
            None => self.tools.push(descriptor),
        }
        self
    }

    pub fn sync_tool<F>(self, descriptor: ToolDescriptor, handler: F) -> Self
    where
        F: Fn(ToolInput) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        self.tool(descriptor, move |input| {
            let output = handler(input);
            async move { output }
        })
    }

    pub fn on_initialize<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ToolError>> + Send + 'static,
    {
        let handler: Arc<LifecycleHandler> =
            Arc::new(move || -> ToolFuture<'static, Result<(), ToolError>> { Box::pin(handler()) });
        self.on_initialize = Some(handler);
        self
    }

    pub fn on_shutdown<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ToolError>> + Send + 'static,
    {
        let handler: Arc<LifecycleHandler> =
            Arc::new(move || -> ToolFuture<'static, Result<(), ToolError>> { Box::pin(handler()) });
        self.on_shutdown = Some(handler);
        self
    }

    pub fn build(self) -> FunctionToolServer {
        FunctionToolServer {
            name: self.name,
            version: self.version,
            description: self.description,
            tools: self.tools,
            dependencies: self.dependencies,
            handlers: self.handlers,
            on_initialize: self.on_initialize,
            on_shutdown: self.on_shutdown,
            lifecycle: Lifecycle::new(),
        }
    }
}
