//! Request, response, and lifecycle types shared by servers and the gateway.

use std::time::{Duration, SystemTime};

use fcommon::{SessionId, UserId, duration_ms};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ToolError, ToolErrorKind};

pub type ToolInput = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerState {
    #[default]
    Uninitialized,
    Ready,
    ShuttingDown,
    Shutdown,
}

impl ServerState {
    pub fn is_ready(self) -> bool {
        self == ServerState::Ready
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub tool: String,
    #[serde(default)]
    pub input: ToolInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl ToolRequest {
    pub fn new(tool: impl Into<String>, input: ToolInput) -> Self {
        Self {
            tool: tool.into(),
            input,
            user_id: None,
            session_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_session(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub execution_time_ms: u64,
    pub timestamp: SystemTime,
}

impl ResponseMetadata {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            execution_time_ms: duration_ms(elapsed),
            timestamp: SystemTime::now(),
        }
    }
}

/// Outcome of a dispatched tool call. Built once through [`ToolResponse::success`]
/// or [`ToolResponse::failure`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error_kind: Option<ToolErrorKind>,
    metadata: ResponseMetadata,
}

impl ToolResponse {
    pub fn success(data: Value, elapsed: Duration) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            metadata: ResponseMetadata::new(elapsed),
        }
    }

    pub fn failure(error: &ToolError, elapsed: Duration) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.message.clone()),
            error_kind: Some(error.kind),
            metadata: ResponseMetadata::new(elapsed),
        }
    }

    pub fn from_result(result: Result<Value, ToolError>, elapsed: Duration) -> Self {
        match result {
            Ok(data) => Self::success(data, elapsed),
            Err(error) => Self::failure(&error, elapsed),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn error_kind(&self) -> Option<ToolErrorKind> {
        self.error_kind
    }

    pub fn metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }

    pub fn execution_time(&self) -> Duration {
        Duration::from_millis(self.metadata.execution_time_ms)
    }

    pub fn into_data(self) -> Option<Value> {
        self.data
    }
}
