//! Capacity-bounded request log.
//!
//! ```rust
//! use fgateway::{LogEntry, RequestLog};
//! use ftooling::{ToolInput, ToolResponse};
//! use std::time::Duration;
//!
//! let mut log = RequestLog::new(2);
//! for tool in ["a", "b", "c"] {
//!     let output = ToolResponse::success(serde_json::Value::Null, Duration::ZERO);
//!     log.push(LogEntry::new("srv", tool, ToolInput::new(), output, Duration::ZERO));
//! }
//!
//! let tools: Vec<String> = log.entries().into_iter().map(|entry| entry.tool_name).collect();
//! assert_eq!(tools, vec!["b", "c"]);
//! ```

use std::collections::VecDeque;
use std::time::{Duration, SystemTime};

use fcommon::{SessionId, UserId, duration_ms};
use ftooling::{ToolInput, ToolResponse};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: SystemTime,
    pub server_name: String,
    pub tool_name: String,
    pub input: ToolInput,
    pub output: ToolResponse,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
}

impl LogEntry {
    pub fn new(
        server_name: impl Into<String>,
        tool_name: impl Into<String>,
        input: ToolInput,
        output: ToolResponse,
        duration: Duration,
    ) -> Self {
        Self {
            timestamp: SystemTime::now(),
            server_name: server_name.into(),
            tool_name: tool_name.into(),
            input,
            output,
            duration_ms: duration_ms(duration),
            actor_id: None,
            session_id: None,
        }
    }

    pub fn with_actor(mut self, actor_id: Option<UserId>, session_id: Option<SessionId>) -> Self {
        self.actor_id = actor_id;
        self.session_id = session_id;
        self
    }
}

/// FIFO ring: once `capacity` is exceeded the oldest entries are dropped.
#[derive(Debug, Clone)]
pub struct RequestLog {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

impl RequestLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::new(),
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Newest `limit` entries, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(limit);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
