//! Production-friendly observability hooks for the tool gateway.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use fgateway::Gateway;
//! use fobserve::{SafeGatewayHooks, TracingObservabilityHooks};
//!
//! let gateway = Gateway::builder()
//!     .hooks(Arc::new(SafeGatewayHooks::new(TracingObservabilityHooks)))
//!     .build()
//!     .expect("gateway");
//! assert!(gateway.server_names().is_empty());
//! ```

mod metrics_hooks;
mod safe_hooks;
mod tracing_hooks;

pub use metrics_hooks::MetricsObservabilityHooks;
pub use safe_hooks::SafeGatewayHooks;
pub use tracing_hooks::TracingObservabilityHooks;

pub mod prelude {
    pub use crate::{MetricsObservabilityHooks, SafeGatewayHooks, TracingObservabilityHooks};
}
