//! Server registry and request dispatcher.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Instant, SystemTime};

use fcommon::OrderedRegistry;
use ftooling::{ToolDescriptor, ToolError, ToolRequest, ToolResponse, ToolServer};
use futures_timer::Delay;
use futures_util::future::{Either, select};
use tokio::sync::Semaphore;

use crate::{
    AuthContext, GatewayConfig, GatewayHooks, GatewayStats, LogEntry, NoopGatewayHooks,
    RequestLog, RoutedTool, ServerStats, ServerStatus,
};

struct ServerHandle {
    server: Arc<dyn ToolServer>,
    registered_at: SystemTime,
    last_used_at: Option<SystemTime>,
    call_count: u64,
}

impl ServerHandle {
    fn new(server: Arc<dyn ToolServer>) -> Self {
        Self {
            server,
            registered_at: SystemTime::now(),
            last_used_at: None,
            call_count: 0,
        }
    }

    fn is_ready(&self) -> bool {
        self.server.state().is_ready()
    }

    fn status(&self) -> ServerStatus {
        ServerStatus {
            name: self.server.name().to_string(),
            version: self.server.version().to_string(),
            description: self.server.description().to_string(),
            state: self.server.state(),
            tool_count: self.server.tools().len(),
            registered_at: self.registered_at,
        }
    }

    fn stats(&self) -> ServerStats {
        ServerStats {
            name: self.server.name().to_string(),
            version: self.server.version().to_string(),
            tool_count: self.server.tools().len(),
            call_count: self.call_count,
            last_used_at: self.last_used_at,
        }
    }
}

pub struct GatewayBuilder {
    config: GatewayConfig,
    hooks: Arc<dyn GatewayHooks>,
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self {
            config: GatewayConfig::default(),
            hooks: Arc::new(NoopGatewayHooks),
        }
    }
}

impl GatewayBuilder {
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn GatewayHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> Result<Gateway, ToolError> {
        self.config.validate()?;

        Ok(Gateway {
            permits: Semaphore::new(self.config.max_concurrent_requests),
            logs: Mutex::new(RequestLog::new(self.config.log_capacity)),
            servers: Mutex::new(OrderedRegistry::new()),
            config: self.config,
            hooks: self.hooks,
        })
    }
}

/// Owns the live tool servers and routes requests to them under the configured
/// auth, timeout, concurrency, and logging policy.
///
/// Tool names resolve to the first registered server that declares them; a
/// later server declaring the same name is shadowed.
pub struct Gateway {
    config: GatewayConfig,
    servers: Mutex<OrderedRegistry<String, ServerHandle>>,
    logs: Mutex<RequestLog>,
    permits: Semaphore,
    hooks: Arc<dyn GatewayHooks>,
}

impl Gateway {
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }

    pub fn new(config: GatewayConfig) -> Result<Self, ToolError> {
        Self::builder().config(config).build()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub async fn register_server<S>(&self, server: S) -> Result<ServerStatus, ToolError>
    where
        S: ToolServer + 'static,
    {
        self.register_shared(Arc::new(server)).await
    }

    /// Initializes `server` and adds it to the registry. Initialization
    /// failures are returned unchanged and leave the registry untouched.
    pub async fn register_shared(
        &self,
        server: Arc<dyn ToolServer>,
    ) -> Result<ServerStatus, ToolError> {
        let name = server.name().to_string();
        {
            let servers = self.lock_servers();
            if servers.contains_key(&name) {
                return Err(duplicate_server(&name));
            }
            if let Some(missing) = server.dependencies().iter().find(|dependency| {
                !servers
                    .get(dependency.as_str())
                    .is_some_and(ServerHandle::is_ready)
            }) {
                return Err(ToolError::initialization(format!(
                    "Server '{name}' depends on '{missing}', which is not registered and ready"
                ))
                .with_server_name(&name));
            }
        }

        server.initialize().await?;

        let status = {
            let mut servers = self.lock_servers();
            if servers.contains_key(&name) {
                None
            } else {
                let handle = ServerHandle::new(Arc::clone(&server));
                let status = handle.status();
                servers.insert(name.clone(), handle);
                Some(status)
            }
        };

        match status {
            Some(status) => {
                self.hooks.on_server_registered(&status);
                Ok(status)
            }
            None => {
                // Lost a registration race for the same name while initializing.
                if let Err(error) = server.shutdown().await {
                    self.hooks.on_server_shutdown_failure(&name, &error);
                }
                Err(duplicate_server(&name))
            }
        }
    }

    /// Shuts the server down, then removes it. A failing shutdown is returned
    /// and the handle stays registered.
    pub async fn unregister_server(&self, name: &str) -> Result<(), ToolError> {
        let server = self
            .lock_servers()
            .get(name)
            .map(|handle| Arc::clone(&handle.server))
            .ok_or_else(|| {
                ToolError::unknown_server(format!("Server '{name}' is not registered"))
                    .with_server_name(name)
            })?;

        server.shutdown().await?;
        self.lock_servers().remove(name);
        self.hooks.on_server_unregistered(name);
        Ok(())
    }

    /// Dispatches `request`. Never fails: every outcome is a [`ToolResponse`].
    pub async fn handle_request(
        &self,
        request: ToolRequest,
        auth: Option<&AuthContext>,
    ) -> ToolResponse {
        let started = Instant::now();

        if self.config.enable_auth && auth.is_none() {
            let response = ToolResponse::failure(
                &ToolError::auth_required("Authentication required"),
                started.elapsed(),
            );
            self.hooks
                .on_dispatch_failure(&request, None, &response, started.elapsed());
            return response;
        }

        let Some((server_name, server)) = self.resolve(&request.tool) else {
            let error = ToolError::tool_not_found(format!(
                "Tool '{}' not found in any registered server",
                request.tool
            ))
            .with_tool_name(&request.tool);
            let response = ToolResponse::failure(&error, started.elapsed());
            self.hooks
                .on_dispatch_failure(&request, None, &response, started.elapsed());
            return response;
        };

        self.hooks.on_dispatch_start(&request, &server_name);
        let response = self.dispatch(server.as_ref(), &request, started).await;
        let elapsed = started.elapsed();

        if response.is_success() {
            self.hooks
                .on_dispatch_success(&request, &server_name, &response, elapsed);
        } else {
            self.hooks
                .on_dispatch_failure(&request, Some(&server_name), &response, elapsed);
        }

        if self.config.enable_logging {
            let entry = LogEntry::new(
                server_name,
                request.tool.clone(),
                request.input.clone(),
                response.clone(),
                elapsed,
            )
            .with_actor(request.user_id.clone(), request.session_id.clone());
            self.lock_logs().push(entry);
        }

        response
    }

    /// Races the server call against the configured timeout. The losing call is
    /// dropped, which stops it at its next suspension point; work the server
    /// spawned elsewhere keeps running.
    async fn dispatch(
        &self,
        server: &dyn ToolServer,
        request: &ToolRequest,
        started: Instant,
    ) -> ToolResponse {
        let Ok(_permit) = self.permits.acquire().await else {
            return ToolResponse::failure(
                &ToolError::internal("gateway admission is closed"),
                started.elapsed(),
            );
        };

        let call = server.execute_tool(&request.tool, request.input.clone());
        let timer = Delay::new(self.config.timeout());

        match select(call, timer).await {
            Either::Left((response, _)) => response,
            Either::Right(((), _)) => ToolResponse::failure(
                &ToolError::timeout("Tool execution timeout")
                    .with_tool_name(&request.tool)
                    .with_server_name(server.name()),
                started.elapsed(),
            ),
        }
    }

    /// First ready server (in registration order) declaring `tool`. Counts the
    /// call against that server.
    fn resolve(&self, tool: &str) -> Option<(String, Arc<dyn ToolServer>)> {
        let mut servers = self.lock_servers();
        let handle = servers
            .values_mut()
            .find(|handle| handle.is_ready() && handle.server.declares(tool))?;

        handle.call_count += 1;
        handle.last_used_at = Some(SystemTime::now());
        Some((handle.server.name().to_string(), Arc::clone(&handle.server)))
    }

    pub fn server_for_tool(&self, tool: &str) -> Option<String> {
        self.lock_servers()
            .values()
            .find(|handle| handle.is_ready() && handle.server.declares(tool))
            .map(|handle| handle.server.name().to_string())
    }

    pub fn all_tools(&self) -> Vec<ToolDescriptor> {
        self.lock_servers()
            .values()
            .filter(|handle| handle.is_ready())
            .flat_map(|handle| handle.server.tools().iter().cloned())
            .collect()
    }

    pub fn tool_definitions(&self) -> Vec<RoutedTool> {
        self.lock_servers()
            .values()
            .filter(|handle| handle.is_ready())
            .flat_map(|handle| {
                let server_name = handle.server.name();
                handle.server.tools().iter().map(move |tool| RoutedTool {
                    server_name: server_name.to_string(),
                    tool: tool.clone(),
                })
            })
            .collect()
    }

    pub fn server_tools(&self, server_name: &str) -> Option<Vec<ToolDescriptor>> {
        self.lock_servers()
            .get(server_name)
            .filter(|handle| handle.is_ready())
            .map(|handle| handle.server.tools().to_vec())
    }

    pub fn tools_by_category(&self) -> BTreeMap<String, Vec<ToolDescriptor>> {
        let mut grouped = BTreeMap::<String, Vec<ToolDescriptor>>::new();
        for tool in self.all_tools() {
            let category = tool.category_or_default().to_string();
            grouped.entry(category).or_default().push(tool);
        }
        grouped
    }

    pub fn server_names(&self) -> Vec<String> {
        self.lock_servers().keys().cloned().collect()
    }

    pub fn server_status(&self) -> Vec<ServerStatus> {
        self.lock_servers().values().map(ServerHandle::status).collect()
    }

    pub fn stats(&self) -> GatewayStats {
        let servers = self.lock_servers();
        let servers: Vec<ServerStats> = servers.values().map(ServerHandle::stats).collect();

        GatewayStats {
            total_servers: servers.len(),
            total_tools: servers.iter().map(|server| server.tool_count).sum(),
            servers,
        }
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.lock_logs().entries()
    }

    pub fn recent_logs(&self, limit: usize) -> Vec<LogEntry> {
        self.lock_logs().recent(limit)
    }

    pub fn clear_logs(&self) {
        self.lock_logs().clear();
    }

    /// Shuts down every server and clears the registry. All servers are
    /// attempted; the first shutdown error is returned afterwards.
    pub async fn shutdown(&self) -> Result<(), ToolError> {
        let handles: Vec<(String, ServerHandle)> = self.lock_servers().drain().collect();
        let mut first_error = None;

        for (name, handle) in handles {
            match handle.server.shutdown().await {
                Ok(()) => self.hooks.on_server_unregistered(&name),
                Err(error) => {
                    self.hooks.on_server_shutdown_failure(&name, &error);
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn lock_servers(&self) -> MutexGuard<'_, OrderedRegistry<String, ServerHandle>> {
        self.servers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_logs(&self) -> MutexGuard<'_, RequestLog> {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn duplicate_server(name: &str) -> ToolError {
    ToolError::duplicate_server(format!("Server '{name}' is already registered"))
        .with_server_name(name)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ftooling::{
        FieldKind, FunctionToolServer, ServerState, ToolErrorKind, ToolInput, UNCATEGORIZED,
    };
    use serde_json::{Value, json};

    use super::*;

    fn echo_server(name: &str) -> FunctionToolServer {
        FunctionToolServer::builder(name, "1.0.0")
            .sync_tool(
                ToolDescriptor::new("echo", "Echo a message")
                    .with_required_field("message", FieldKind::String, "text")
                    .with_category("utility"),
                |input| Ok(Value::Object(input)),
            )
            .build()
    }

    fn message(text: &str) -> ToolInput {
        json!({ "message": text }).as_object().cloned().expect("object")
    }

    #[tokio::test]
    async fn register_rejects_duplicate_names_without_mutation() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        gateway
            .register_server(echo_server("echo"))
            .await
            .expect("first register");

        let error = gateway
            .register_server(echo_server("echo"))
            .await
            .expect_err("duplicate should fail");

        assert_eq!(error.kind, ToolErrorKind::DuplicateServer);
        assert_eq!(gateway.stats().total_servers, 1);
    }

    #[tokio::test]
    async fn first_registered_server_wins_name_collisions() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        gateway.register_server(echo_server("alpha")).await.expect("alpha");
        gateway.register_server(echo_server("beta")).await.expect("beta");

        let response = gateway
            .handle_request(ToolRequest::new("echo", message("hi")), None)
            .await;

        assert!(response.is_success());
        assert_eq!(gateway.server_for_tool("echo").as_deref(), Some("alpha"));
        let stats = gateway.stats();
        assert_eq!(stats.server("alpha").map(|s| s.call_count), Some(1));
        assert_eq!(stats.server("beta").map(|s| s.call_count), Some(0));
    }

    #[tokio::test]
    async fn unregister_unknown_server_fails() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");

        let error = gateway
            .unregister_server("ghost")
            .await
            .expect_err("unknown server");

        assert_eq!(error.kind, ToolErrorKind::UnknownServer);
    }

    #[tokio::test]
    async fn unregister_shuts_down_and_hides_tools() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        let server: Arc<dyn ToolServer> = Arc::new(echo_server("echo"));
        gateway
            .register_shared(Arc::clone(&server))
            .await
            .expect("register");

        gateway.unregister_server("echo").await.expect("unregister");

        assert_eq!(server.state(), ServerState::Shutdown);
        assert!(gateway.all_tools().is_empty());
        assert!(gateway.server_names().is_empty());
    }

    #[tokio::test]
    async fn auth_gate_rejects_missing_context() {
        let gateway =
            Gateway::new(GatewayConfig::default().with_auth(true)).expect("gateway");
        gateway.register_server(echo_server("echo")).await.expect("register");

        let denied = gateway
            .handle_request(ToolRequest::new("echo", message("hi")), None)
            .await;
        assert_eq!(denied.error(), Some("Authentication required"));
        assert_eq!(denied.error_kind(), Some(ToolErrorKind::AuthRequired));
        assert_eq!(gateway.stats().total_calls(), 0);

        let auth = AuthContext::new("user-1", "session-1");
        let allowed = gateway
            .handle_request(ToolRequest::new("echo", message("hi")), Some(&auth))
            .await;
        assert!(allowed.is_success());
    }

    #[tokio::test]
    async fn logging_can_be_disabled() {
        let gateway =
            Gateway::new(GatewayConfig::default().with_logging(false)).expect("gateway");
        gateway.register_server(echo_server("echo")).await.expect("register");

        gateway
            .handle_request(ToolRequest::new("echo", message("hi")), None)
            .await;

        assert!(gateway.logs().is_empty());
    }

    #[tokio::test]
    async fn log_entries_capture_actor_identity() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        gateway.register_server(echo_server("echo")).await.expect("register");

        gateway
            .handle_request(
                ToolRequest::new("echo", message("hi"))
                    .with_user("user-7")
                    .with_session("session-7"),
                None,
            )
            .await;

        let entries = gateway.recent_logs(1);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].server_name, "echo");
        assert_eq!(entries[0].tool_name, "echo");
        assert_eq!(entries[0].actor_id.as_ref().map(|id| id.as_str()), Some("user-7"));
        assert!(entries[0].output.is_success());

        gateway.clear_logs();
        assert!(gateway.logs().is_empty());
    }

    #[tokio::test]
    async fn tool_views_group_and_annotate_tools() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        gateway.register_server(echo_server("echo")).await.expect("register");
        gateway
            .register_server(
                FunctionToolServer::builder("fs", "2.0.0")
                    .sync_tool(ToolDescriptor::new("read_file", "Read a file"), |_| {
                        Ok(Value::Null)
                    })
                    .build(),
            )
            .await
            .expect("register fs");

        let routed = gateway.tool_definitions();
        assert_eq!(routed.len(), 2);
        assert_eq!(routed[1].server_name, "fs");

        let grouped = gateway.tools_by_category();
        assert_eq!(grouped.get("utility").map(Vec::len), Some(1));
        assert_eq!(grouped.get(UNCATEGORIZED).map(Vec::len), Some(1));

        assert_eq!(gateway.server_tools("fs").map(|tools| tools.len()), Some(1));
        assert!(gateway.server_tools("nope").is_none());

        let stats = gateway.stats();
        assert_eq!(stats.total_servers, 2);
        assert_eq!(stats.total_tools, 2);
    }

    #[tokio::test]
    async fn shutdown_is_best_effort_and_clears_registry() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        gateway
            .register_server(
                FunctionToolServer::builder("stubborn", "1.0.0")
                    .on_shutdown(|| async { Err(ToolError::execution("socket busy")) })
                    .build(),
            )
            .await
            .expect("register stubborn");
        let polite: Arc<dyn ToolServer> = Arc::new(echo_server("polite"));
        gateway
            .register_shared(Arc::clone(&polite))
            .await
            .expect("register polite");

        let error = gateway.shutdown().await.expect_err("stubborn shutdown fails");

        assert_eq!(error.message, "socket busy");
        assert_eq!(polite.state(), ServerState::Shutdown);
        assert_eq!(gateway.stats().total_servers, 0);
    }

    #[tokio::test]
    async fn concurrency_limit_queues_requests() {
        let gateway = Arc::new(
            Gateway::new(GatewayConfig::default().with_max_concurrent_requests(1))
                .expect("gateway"),
        );
        gateway
            .register_server(
                FunctionToolServer::builder("slow", "1.0.0")
                    .tool(ToolDescriptor::new("nap", "Sleeps briefly"), |_| async {
                        Delay::new(Duration::from_millis(50)).await;
                        Ok(Value::Null)
                    })
                    .build(),
            )
            .await
            .expect("register");

        let started = Instant::now();
        let (first, second) = futures_util::future::join(
            gateway.handle_request(ToolRequest::new("nap", ToolInput::new()), None),
            gateway.handle_request(ToolRequest::new("nap", ToolInput::new()), None),
        )
        .await;

        assert!(first.is_success());
        assert!(second.is_success());
        assert!(started.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn panicking_handler_is_reported_not_propagated() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        gateway
            .register_server(
                FunctionToolServer::builder("fragile", "1.0.0")
                    .sync_tool(ToolDescriptor::new("boom", "Always panics"), |_| {
                        panic!("handler bug")
                    })
                    .build(),
            )
            .await
            .expect("register");

        let response = gateway
            .handle_request(ToolRequest::new("boom", ToolInput::new()), None)
            .await;

        assert!(!response.is_success());
        assert_eq!(response.error_kind(), Some(ToolErrorKind::Execution));
        assert_eq!(gateway.logs().len(), 1);
        assert_eq!(gateway.stats().server("fragile").map(|s| s.call_count), Some(1));
    }

    #[tokio::test]
    async fn register_requires_ready_dependencies() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        let dependent = || {
            FunctionToolServer::builder("deploy", "1.0.0")
                .depends_on("echo")
                .sync_tool(ToolDescriptor::new("ship", "Ship it"), |_| Ok(Value::Null))
                .build()
        };

        let error = gateway
            .register_server(dependent())
            .await
            .expect_err("missing dependency");
        assert_eq!(error.kind, ToolErrorKind::Initialization);
        assert_eq!(
            error.message,
            "Server 'deploy' depends on 'echo', which is not registered and ready"
        );
        assert_eq!(error.server_name.as_deref(), Some("deploy"));
        assert!(gateway.server_names().is_empty());

        gateway.register_server(echo_server("echo")).await.expect("echo");
        gateway
            .register_server(dependent())
            .await
            .expect("dependency satisfied");

        assert_eq!(gateway.server_names(), vec!["echo".to_string(), "deploy".to_string()]);
    }

    #[tokio::test]
    async fn dependency_that_is_shut_down_does_not_count() {
        let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
        let echo: Arc<dyn ToolServer> = Arc::new(echo_server("echo"));
        gateway
            .register_shared(Arc::clone(&echo))
            .await
            .expect("register echo");
        echo.shutdown().await.expect("shutdown echo");

        let error = gateway
            .register_server(
                FunctionToolServer::builder("deploy", "1.0.0")
                    .depends_on("echo")
                    .build(),
            )
            .await
            .expect_err("dependency is not ready");

        assert_eq!(error.kind, ToolErrorKind::Initialization);
        assert_eq!(gateway.server_names(), vec!["echo".to_string()]);
    }
}
