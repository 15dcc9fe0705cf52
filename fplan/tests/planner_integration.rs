use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use fgateway::{Gateway, GatewayClient, GatewayConfig};
use fplan::{ChainCatalog, STEP_COST, ToolPlanner};
use fselect::{SelectionContext, ToolSelector};
use ftooling::{FieldKind, FunctionToolServer, ToolDescriptor, ToolError, ToolInput};
use serde_json::{Value, json};

fn dev_tools() -> FunctionToolServer {
    FunctionToolServer::builder("dev-tools", "1.0.0")
        .sync_tool(
            ToolDescriptor::new("read_file", "Read a file from disk")
                .with_optional_field("path", FieldKind::String, "File path")
                .with_category("filesystem"),
            |_| Ok(json!({"content": "fn main() {}"})),
        )
        .sync_tool(
            ToolDescriptor::new("edit_file", "Edit a file in place").with_category("filesystem"),
            |_| Ok(Value::Null),
        )
        .sync_tool(
            ToolDescriptor::new("analyze_code", "Analyze source code"),
            |_| Ok(Value::Null),
        )
        .sync_tool(ToolDescriptor::new("lint_code", "Lint source code"), |_| {
            Ok(Value::Null)
        })
        .sync_tool(ToolDescriptor::new("run_tests", "Run the test suite"), |_| {
            Ok(json!({"passed": 12}))
        })
        .sync_tool(ToolDescriptor::new("git_commit", "Create a git commit"), |_| {
            Ok(Value::Null)
        })
        .sync_tool(
            ToolDescriptor::new("run_command", "Execute a shell command (exec)"),
            |_| Ok(Value::Null),
        )
        .build()
}

async fn planner_with(server: FunctionToolServer) -> ToolPlanner {
    let gateway = Arc::new(Gateway::new(GatewayConfig::default()).expect("gateway"));
    gateway.register_server(server).await.expect("register");
    ToolPlanner::new(
        GatewayClient::for_user(gateway, "planner-user", None),
        Arc::new(ToolSelector::new()),
    )
}

fn names(tools: &[ToolDescriptor]) -> Vec<&str> {
    tools.iter().map(|tool| tool.name.as_str()).collect()
}

#[tokio::test]
async fn chain_stops_at_first_failing_step() {
    let third_calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&third_calls);
    let server = FunctionToolServer::builder("pipeline", "1.0.0")
        .sync_tool(ToolDescriptor::new("step_one", "First step"), |_| {
            Ok(json!("one"))
        })
        .sync_tool(ToolDescriptor::new("step_two", "Second step"), |_| {
            Err(ToolError::execution("step two exploded"))
        })
        .sync_tool(ToolDescriptor::new("step_three", "Third step"), move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(json!("three"))
        })
        .build();
    let planner = planner_with(server).await;

    let results = planner
        .execute_chain(
            &["step_one", "step_two", "step_three"],
            &[],
            &SelectionContext::new(),
        )
        .await;

    assert_eq!(results.len(), 2);
    assert!(results[0].is_success());
    assert_eq!(results[1].tool, "step_two");
    assert_eq!(results[1].response.error(), Some("step two exploded"));
    assert_eq!(third_calls.load(Ordering::SeqCst), 0);

    let selector = planner.selector();
    assert_eq!(selector.usage_pattern("step_two").map(|p| p.success_rate), Some(0.0));
    assert!(selector.usage_pattern("step_three").is_none());
}

#[tokio::test]
async fn chain_steps_receive_their_params_and_feed_usage_stats() {
    let planner = planner_with(dev_tools()).await;
    let path = json!({"path": "src/main.rs"})
        .as_object()
        .cloned()
        .expect("object");

    let results = planner
        .execute_chain(
            &["read_file".to_string(), "lint_code".to_string()],
            &[path],
            &SelectionContext::new().with_hour(14),
        )
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|step| step.is_success()));
    assert_eq!(results[1].input, ToolInput::new());

    let read = planner
        .selector()
        .usage_pattern("read_file")
        .expect("usage recorded");
    assert_eq!(read.parameter_keys, vec!["path"]);
    assert_eq!(read.contexts, vec!["afternoon"]);

    let stats = planner.selector().tool_stats();
    assert_eq!(stats.total_tools_used, 2);
    assert_eq!(stats.tools_by_category.get("filesystem"), Some(&1));
}

#[tokio::test]
async fn named_chain_skips_tools_the_gateway_lacks() {
    let planner = planner_with(dev_tools()).await;

    let chain = planner.get_chain("code_review").expect("known chain");

    assert_eq!(names(&chain), vec!["read_file", "analyze_code", "lint_code"]);
    assert!(planner.get_chain("moonwalk").is_none());
}

#[tokio::test]
async fn custom_chain_uses_canonical_stage_order() {
    let planner = planner_with(dev_tools()).await;

    let chain = planner.build_custom_chain(
        "commit the change once tests pass, but read the file first",
        &SelectionContext::new(),
    );

    assert_eq!(
        names(&chain),
        vec!["read_file", "edit_file", "run_tests", "git_commit"]
    );
}

#[tokio::test]
async fn custom_chain_falls_back_to_selected_tool() {
    let planner = planner_with(dev_tools()).await;
    let context = SelectionContext::new().with_recent_app("shell");

    let chain = planner.build_custom_chain("run the command", &context);
    assert_eq!(names(&chain), vec!["run_command"]);

    let nothing = planner.build_custom_chain("water the plants", &SelectionContext::new());
    assert!(nothing.is_empty());
}

#[tokio::test]
async fn plan_adds_one_tool_per_extra_clause() {
    let planner = planner_with(dev_tools()).await;
    let context = SelectionContext::new();
    let none = ToolInput::new();
    let tick = Duration::from_millis(20);
    let selector = planner.selector();
    selector.record_tool_usage("read_file", tick, true, &none, &context);
    selector.record_tool_usage("read_file", tick, true, &none, &context);
    selector.record_tool_usage("git_commit", tick, true, &none, &context);

    let plan = planner.plan_tool_execution("read the config and commit the result", &context);

    assert_eq!(plan.tool_names(), vec!["read_file", "git_commit"]);
    assert_eq!(plan.estimated_duration, STEP_COST * 2);
    assert!(plan.rationale.contains("read_file"));
    assert!(plan.rationale.contains("git_commit"));
}

#[tokio::test]
async fn plan_skips_duplicates_and_reports_empty_plans() {
    let planner = planner_with(dev_tools()).await;
    let context = SelectionContext::new().with_recent_app("file");

    let plan = planner.plan_tool_execution("read the file and read it again", &context);
    assert_eq!(plan.tool_names(), vec!["read_file"]);
    assert_eq!(plan.estimated_duration, STEP_COST);

    let empty = planner.plan_tool_execution("water the plants", &SelectionContext::new());
    assert!(empty.is_empty());
    assert_eq!(empty.estimated_duration, Duration::ZERO);
    assert_eq!(empty.rationale, "no catalog tool matched the task");
}

#[tokio::test]
async fn custom_catalog_replaces_standard_chains() {
    let planner = planner_with(dev_tools())
        .await
        .with_chains(ChainCatalog::empty().with_chain("ship", ["run_tests", "git_commit"]));

    let suggestion = planner
        .suggest_chain("ship it after run_tests")
        .expect("ship suggested");

    assert_eq!(suggestion.name, "ship");
    assert!((suggestion.confidence - 0.75).abs() < 1e-9);
    assert!(planner.get_chain("code_review").is_none());
}
