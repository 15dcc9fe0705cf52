//! Capability layer: tool descriptors, the tool server contract, and input validation.

mod error;
mod function;
mod schema;
mod server;
mod types;
mod validate;

pub mod prelude {
    pub use crate::{
        FieldKind, FunctionToolServer, ServerState, ToolDescriptor, ToolError, ToolErrorKind,
        ToolFuture, ToolInput, ToolRequest, ToolResponse, ToolServer,
    };
}

pub use error::{ToolError, ToolErrorKind};
pub use function::{FunctionToolServer, FunctionToolServerBuilder};
pub use schema::{FieldContract, FieldKind, InputSchema, ToolDescriptor, UNCATEGORIZED};
pub use server::{Lifecycle, ToolFuture, ToolServer};
pub use types::{ResponseMetadata, ServerState, ToolInput, ToolRequest, ToolResponse};
pub use validate::{parse_input, required_str, validate_input};
