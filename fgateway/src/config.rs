//! Gateway policy configuration.
//!
//! ```rust
//! use fgateway::GatewayConfig;
//!
//! let config = GatewayConfig::from_json_str(r#"{"enable_auth":true,"timeout_ms":500}"#)
//!     .expect("config should parse");
//!
//! assert!(config.enable_auth);
//! assert!(config.enable_logging);
//! assert_eq!(config.timeout_ms, 500);
//! assert_eq!(config.max_concurrent_requests, 100);
//! ```

use std::time::Duration;

use ftooling::ToolError;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub enable_auth: bool,
    pub enable_logging: bool,
    pub max_concurrent_requests: usize,
    pub timeout_ms: u64,
    pub log_capacity: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enable_auth: false,
            enable_logging: true,
            max_concurrent_requests: 100,
            timeout_ms: 30_000,
            log_capacity: 1_000,
        }
    }
}

impl GatewayConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ToolError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|err| ToolError::configuration(format!("invalid gateway config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_auth(mut self, enable_auth: bool) -> Self {
        self.enable_auth = enable_auth;
        self
    }

    pub fn with_logging(mut self, enable_logging: bool) -> Self {
        self.enable_logging = enable_logging;
        self
    }

    pub fn with_max_concurrent_requests(mut self, max_concurrent_requests: usize) -> Self {
        self.max_concurrent_requests = max_concurrent_requests;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_log_capacity(mut self, log_capacity: usize) -> Self {
        self.log_capacity = log_capacity;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ToolError> {
        if self.timeout_ms == 0 {
            return Err(ToolError::configuration(
                "gateway config requires timeout_ms >= 1",
            ));
        }

        let limit = self.max_concurrent_requests;
        if limit == 0 || limit > Semaphore::MAX_PERMITS {
            return Err(ToolError::configuration(format!(
                "gateway config requires 1 <= max_concurrent_requests <= {}",
                Semaphore::MAX_PERMITS
            )));
        }

        if self.log_capacity == 0 {
            return Err(ToolError::configuration(
                "gateway config requires log_capacity >= 1",
            ));
        }

        Ok(())
    }
}
