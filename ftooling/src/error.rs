//! Tool orchestration errors and classifications.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    DuplicateServer,
    UnknownServer,
    ToolNotFound,
    Validation,
    Timeout,
    Execution,
    AuthRequired,
    Initialization,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub message: String,
    pub retryable: bool,
    pub tool_name: Option<String>,
    pub server_name: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            retryable,
            tool_name: None,
            server_name: None,
        }
    }

    pub fn duplicate_server(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::DuplicateServer, message, false)
    }

    pub fn unknown_server(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::UnknownServer, message, false)
    }

    pub fn tool_not_found(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ToolNotFound, message, false)
    }

    /// Validation failures are always reported with the `Invalid input:` prefix.
    pub fn validation(detail: impl Display) -> Self {
        Self::new(
            ToolErrorKind::Validation,
            format!("Invalid input: {detail}"),
            false,
        )
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Timeout, message, true)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Execution, message, false)
    }

    pub fn auth_required(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::AuthRequired, message, false)
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Initialization, message, false)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Configuration, message, false)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, message, false)
    }

    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn with_server_name(mut self, server_name: impl Into<String>) -> Self {
        self.server_name = Some(server_name.into());
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn is_user_error(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::Validation | ToolErrorKind::ToolNotFound | ToolErrorKind::AuthRequired
        )
    }

    /// Registry-management failures propagate to callers; everything else is
    /// folded into a failed response at dispatch time.
    pub fn is_administrative(&self) -> bool {
        matches!(
            self.kind,
            ToolErrorKind::DuplicateServer
                | ToolErrorKind::UnknownServer
                | ToolErrorKind::Initialization
        )
    }
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.server_name, &self.tool_name) {
            (Some(server_name), Some(tool_name)) => write!(
                f,
                "{:?} [server={}, tool={}]: {}",
                self.kind, server_name, tool_name, self.message
            ),
            (Some(server_name), None) => {
                write!(f, "{:?} [server={}]: {}", self.kind, server_name, self.message)
            }
            (None, Some(tool_name)) => {
                write!(f, "{:?} [tool={}]: {}", self.kind, tool_name, self.message)
            }
            (None, None) => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ToolError {}
