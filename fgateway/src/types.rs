//! Auth context and the read-only views the gateway hands out.

use std::time::SystemTime;

use fcommon::{SessionId, UserId};
use ftooling::{ServerState, ToolDescriptor};
use serde::{Deserialize, Serialize};

/// Caller credentials. With auth enabled only its presence is checked;
/// permission enforcement belongs to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: UserId,
    pub session_id: SessionId,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AuthContext {
    pub fn new(user_id: impl Into<UserId>, session_id: impl Into<SessionId>) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            permissions: Vec::new(),
        }
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|granted| granted == permission)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedTool {
    pub server_name: String,
    pub tool: ToolDescriptor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStats {
    pub name: String,
    pub version: String,
    pub tool_count: usize,
    pub call_count: u64,
    pub last_used_at: Option<SystemTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GatewayStats {
    pub total_servers: usize,
    pub total_tools: usize,
    pub servers: Vec<ServerStats>,
}

impl GatewayStats {
    pub fn server(&self, name: &str) -> Option<&ServerStats> {
        self.servers.iter().find(|server| server.name == name)
    }

    pub fn total_calls(&self) -> u64 {
        self.servers.iter().map(|server| server.call_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub name: String,
    pub version: String,
    pub description: String,
    pub state: ServerState,
    pub tool_count: usize,
    pub registered_at: SystemTime,
}
