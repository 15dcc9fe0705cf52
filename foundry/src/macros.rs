/// Creates a [`ToolInput`](crate::ToolInput) from `key => value` pairs.
///
/// Values go through `serde_json::json!`, so nested objects and arrays work.
///
/// ```rust
/// use foundry::tool_input;
///
/// let input = tool_input! { "path" => "src/lib.rs", "limit" => 20 };
/// assert_eq!(input.get("limit").and_then(|value| value.as_u64()), Some(20));
///
/// let empty = tool_input! {};
/// assert!(empty.is_empty());
/// ```
#[macro_export]
macro_rules! tool_input {
    () => {
        $crate::ToolInput::new()
    };
    ($($key:expr => $value:tt),+ $(,)?) => {{
        let mut input = $crate::ToolInput::new();
        $(
            input.insert(::std::string::String::from($key), $crate::serde_json::json!($value));
        )+
        input
    }};
}

/// Creates a [`ToolRequest`](crate::ToolRequest) for `tool`, optionally with inputs.
///
/// ```rust
/// use foundry::tool_request;
///
/// let request = tool_request!("echo", { "message" => "hi" });
/// assert_eq!(request.tool, "echo");
/// assert_eq!(request.input.len(), 1);
///
/// let bare = tool_request!("list_servers");
/// assert!(bare.input.is_empty());
/// ```
#[macro_export]
macro_rules! tool_request {
    ($tool:expr $(,)?) => {
        $crate::ToolRequest::new($tool, $crate::ToolInput::new())
    };
    ($tool:expr, { $($body:tt)* } $(,)?) => {
        $crate::ToolRequest::new($tool, $crate::tool_input! { $($body)* })
    };
}
