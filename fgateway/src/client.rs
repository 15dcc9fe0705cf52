//! Per-actor client facade over a shared [`Gateway`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fgateway::{Gateway, GatewayClient, GatewayConfig};
//!
//! let gateway = Arc::new(Gateway::new(GatewayConfig::default()).expect("gateway"));
//! let mut client = GatewayClient::new(gateway);
//! client.set_user("user-1", Some("session-1".into()));
//!
//! assert_eq!(client.user_id().map(|id| id.as_str()), Some("user-1"));
//! assert!(client.available_tools().is_empty());
//! ```

use std::sync::Arc;

use fcommon::{SessionId, UserId};
use ftooling::{ToolDescriptor, ToolInput, ToolRequest, ToolResponse};

use crate::{AuthContext, Gateway, GatewayStats};

#[derive(Clone)]
pub struct GatewayClient {
    gateway: Arc<Gateway>,
    user_id: Option<UserId>,
    session_id: Option<SessionId>,
    auth: Option<AuthContext>,
}

impl GatewayClient {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            user_id: None,
            session_id: None,
            auth: None,
        }
    }

    pub fn for_user(
        gateway: Arc<Gateway>,
        user_id: impl Into<UserId>,
        session_id: Option<SessionId>,
    ) -> Self {
        let mut client = Self::new(gateway);
        client.set_user(user_id, session_id);
        client
    }

    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn set_user(&mut self, user_id: impl Into<UserId>, session_id: Option<SessionId>) {
        self.user_id = Some(user_id.into());
        self.session_id = session_id;
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    pub fn gateway(&self) -> Arc<Gateway> {
        Arc::clone(&self.gateway)
    }

    pub async fn execute_tool(&self, tool: impl Into<String>, input: ToolInput) -> ToolResponse {
        let mut request = ToolRequest::new(tool, input);
        request.user_id = self.user_id.clone();
        request.session_id = self.session_id.clone();

        self.gateway.handle_request(request, self.auth.as_ref()).await
    }

    pub fn available_tools(&self) -> Vec<ToolDescriptor> {
        self.gateway.all_tools()
    }

    pub fn tools_by_server(&self, server_name: &str) -> Vec<ToolDescriptor> {
        self.gateway.server_tools(server_name).unwrap_or_default()
    }

    /// Case-insensitive substring search over tool names and descriptions.
    pub fn search_tools(&self, query: &str) -> Vec<ToolDescriptor> {
        self.gateway
            .all_tools()
            .into_iter()
            .filter(|tool| tool.matches_query(query))
            .collect()
    }

    pub fn stats(&self) -> GatewayStats {
        self.gateway.stats()
    }
}
