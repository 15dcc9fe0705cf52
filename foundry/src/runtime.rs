//! Runtime wiring helpers for gateway, selector, and planner usage.

use std::sync::Arc;

use fcommon::{SessionId, UserId};

use crate::{
    Gateway, GatewayClient, GatewayConfig, GatewayHooks, KeywordTable, ToolError, ToolPlanner,
    ToolSelector, ToolServer,
};

#[derive(Clone)]
pub struct ToolingBundle {
    pub gateway: Arc<Gateway>,
    pub selector: Arc<ToolSelector>,
    pub planner: Arc<ToolPlanner>,
}

impl ToolingBundle {
    /// Client bound to `user_id` that shares this bundle's gateway.
    pub fn client_for(
        &self,
        user_id: impl Into<UserId>,
        session_id: Option<SessionId>,
    ) -> GatewayClient {
        GatewayClient::for_user(Arc::clone(&self.gateway), user_id, session_id)
    }

    /// Registers every server in order and stops at the first failure.
    pub async fn register_all<I>(&self, servers: I) -> Result<(), ToolError>
    where
        I: IntoIterator<Item = Arc<dyn ToolServer>>,
    {
        for server in servers {
            self.gateway.register_shared(server).await?;
        }
        Ok(())
    }

    pub async fn shutdown(&self) -> Result<(), ToolError> {
        self.gateway.shutdown().await
    }
}

pub fn build_tooling(config: GatewayConfig) -> Result<ToolingBundle, ToolError> {
    build_tooling_with(config, None, KeywordTable::standard())
}

pub fn build_tooling_with_hooks(
    config: GatewayConfig,
    hooks: Arc<dyn GatewayHooks>,
) -> Result<ToolingBundle, ToolError> {
    build_tooling_with(config, Some(hooks), KeywordTable::standard())
}

/// Gateway wired to panic-isolated tracing hooks.
#[cfg(feature = "observability")]
pub fn build_observed_tooling(config: GatewayConfig) -> Result<ToolingBundle, ToolError> {
    let hooks = fobserve::SafeGatewayHooks::new(fobserve::TracingObservabilityHooks);
    build_tooling_with_hooks(config, Arc::new(hooks))
}

pub fn build_tooling_with(
    config: GatewayConfig,
    hooks: Option<Arc<dyn GatewayHooks>>,
    keywords: KeywordTable,
) -> Result<ToolingBundle, ToolError> {
    let mut builder = Gateway::builder().config(config);
    if let Some(hooks) = hooks {
        builder = builder.hooks(hooks);
    }

    let gateway = Arc::new(builder.build()?);
    let selector = Arc::new(ToolSelector::with_keywords(keywords));
    let planner = Arc::new(ToolPlanner::new(
        GatewayClient::new(Arc::clone(&gateway)),
        Arc::clone(&selector),
    ));

    Ok(ToolingBundle {
        gateway,
        selector,
        planner,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use crate::{
        FieldKind, FunctionToolServer, GatewayConfig, KeywordTable, SelectionContext,
        ToolDescriptor, ToolErrorKind, ToolServer,
    };

    use super::{build_tooling, build_tooling_with};

    fn echo_server(name: &str) -> Arc<dyn ToolServer> {
        Arc::new(
            FunctionToolServer::builder(name, "1.0.0")
                .sync_tool(
                    ToolDescriptor::new("echo", "Echo a message")
                        .with_required_field("message", FieldKind::String, "Text"),
                    |input| Ok(Value::Object(input)),
                )
                .build(),
        )
    }

    #[tokio::test]
    async fn bundle_shares_one_gateway_between_clients_and_planner() {
        let tooling = build_tooling(GatewayConfig::default()).expect("tooling should build");
        tooling
            .register_all([echo_server("echo-server")])
            .await
            .expect("register");

        let client = tooling.client_for("user-1", Some("session-1".into()));
        let response = client
            .execute_tool("echo", crate::tool_input! { "message" => "hi" })
            .await;

        assert!(response.is_success());
        assert_eq!(response.data(), Some(&json!({"message": "hi"})));
        assert_eq!(tooling.planner.catalog().len(), 1);
        assert_eq!(
            tooling.gateway.logs()[0].actor_id.as_ref().map(|id| id.as_str()),
            Some("user-1")
        );

        tooling.shutdown().await.expect("shutdown");
        assert!(tooling.gateway.server_names().is_empty());
    }

    #[tokio::test]
    async fn register_all_stops_at_duplicate() {
        let tooling = build_tooling(GatewayConfig::default()).expect("tooling should build");

        let error = tooling
            .register_all([echo_server("a"), echo_server("a"), echo_server("b")])
            .await
            .expect_err("duplicate should fail");

        assert_eq!(error.kind, ToolErrorKind::DuplicateServer);
        assert_eq!(tooling.gateway.server_names(), vec!["a".to_string()]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let error = build_tooling(GatewayConfig::default().with_max_concurrent_requests(0))
            .err()
            .expect("zero concurrency is invalid");

        assert_eq!(error.kind, ToolErrorKind::Configuration);
    }

    #[test]
    fn custom_keywords_reach_the_selector() {
        let keywords = KeywordTable::empty()
            .with_rule("echo", r"\b(echo|repeat)\b")
            .expect("valid rule");
        let tooling =
            build_tooling_with(GatewayConfig::default(), None, keywords).expect("tooling");

        assert_eq!(
            tooling.selector.extract_keywords("repeat after me"),
            vec!["echo"]
        );
        assert!(
            tooling
                .planner
                .build_custom_chain("repeat after me", &SelectionContext::new())
                .is_empty()
        );
    }
}
