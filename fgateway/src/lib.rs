//! Tool server registry, timeout-bound dispatcher, and per-actor client facade.
//!
//! ```rust
//! use fgateway::{Gateway, GatewayConfig};
//! use ftooling::{FieldKind, FunctionToolServer, ToolDescriptor, ToolRequest};
//! use serde_json::{Value, json};
//!
//! let runtime = tokio::runtime::Builder::new_current_thread().build().expect("runtime");
//! runtime.block_on(async {
//!     let gateway = Gateway::new(GatewayConfig::default()).expect("gateway");
//!     gateway
//!         .register_server(
//!             FunctionToolServer::builder("echo", "1.0.0")
//!                 .sync_tool(
//!                     ToolDescriptor::new("echo", "Echo a message")
//!                         .with_required_field("message", FieldKind::String, "Text"),
//!                     |input| Ok(Value::Object(input)),
//!                 )
//!                 .build(),
//!         )
//!         .await
//!         .expect("register");
//!
//!     let input = json!({"message": "hi"}).as_object().cloned().expect("object");
//!     let response = gateway.handle_request(ToolRequest::new("echo", input), None).await;
//!     assert!(response.is_success());
//! });
//! ```

mod client;
mod config;
mod gateway;
mod hooks;
mod log;
mod types;

pub mod prelude {
    pub use crate::{
        AuthContext, Gateway, GatewayClient, GatewayConfig, GatewayHooks, GatewayStats,
        LogEntry, NoopGatewayHooks,
    };
}

pub use client::GatewayClient;
pub use config::GatewayConfig;
pub use gateway::{Gateway, GatewayBuilder};
pub use hooks::{GatewayHooks, NoopGatewayHooks};
pub use log::{LogEntry, RequestLog};
pub use types::{AuthContext, GatewayStats, RoutedTool, ServerStats, ServerStatus};
