//! Demo binary: wires a scripted `LlmProvider` to the bundled exec/file
//! tools and runs one task end-to-end, printing the resulting
//! `AgentResult` as JSON. Mirrors the bootstrap shape of a prior system's
//! `main.rs` (tracing init, config-from-argv, collaborator wiring) without
//! the HTTP server, which is out of scope for this engine.

use std::sync::Arc;

use ao_domain::cancel::CancelToken;
use ao_domain::collaborators::{
    AssistantMessage, CompletionRequest, CompletionResponse, LlmProvider, LlmUsage,
};
use ao_domain::error::Result;
use ao_domain::goal::AgentGoal;
use ao_orchestrator::{EngineConfig, Orchestrator};
use ao_tools::{LocalToolExecutor, StaticToolRegistry};
use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

/// A fixed single-step provider standing in for a real LLM transport
/// (explicitly out of scope): called with an empty tool list it is
/// serving the Critic and always reports the goal satisfied; called with
/// tools available it is serving the Planner and lists the current
/// directory.
struct ScriptedProvider;

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        if request.tools.is_empty() {
            return Ok(CompletionResponse {
                assistant_message: AssistantMessage {
                    content: r#"{"goal_satisfied": true, "assessment": "directory listed", "known_gaps": [], "recommendation": "stop"}"#.to_string(),
                    tool_calls: vec![],
                },
                usage: LlmUsage::default(),
                finish_reason: "stop".to_string(),
                model: "scripted-demo".to_string(),
            });
        }

        Ok(CompletionResponse {
            assistant_message: AssistantMessage {
                content: String::new(),
                tool_calls: vec![ao_domain::collaborators::LlmToolCall {
                    id: "call-1".to_string(),
                    name: "list_directory".to_string(),
                    arguments_json: r#"{"path": "."}"#.to_string(),
                }],
            },
            usage: LlmUsage::default(),
            finish_reason: "tool_calls".to_string(),
            model: "scripted-demo".to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ao_orchestrator=info")))
        .json()
        .init();

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = EngineConfig::load_or_default(&config_path).clamped();

    let workspace_root = std::env::current_dir()?;
    let tool_registry = Arc::new(StaticToolRegistry::default());
    let tool_executor = Arc::new(LocalToolExecutor::new(workspace_root));
    let state_store = Arc::new(ao_state::InMemoryStateStore::new(&config.state_dir)?);
    let provider = Arc::new(ScriptedProvider);

    let orchestrator = Orchestrator::new(provider, tool_registry, tool_executor, state_store, &config);

    let goal = AgentGoal::new("List files in the current directory", vec![]);
    let result = orchestrator
        .run(goal, config.budget, config.error_policy.clone(), CancelToken::new(), None)
        .await;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
