use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::message::Message;
use crate::state::{AgentState, TraceId};

/// A single declared tool parameter, as surfaced by a `ToolRegistry`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    /// Declared type keyword (e.g. "string", "integer", "boolean", "array").
    pub type_keyword: String,
    pub description: String,
    pub required: bool,
    pub default: Option<serde_json::Value>,
    pub allowed_values: Vec<serde_json::Value>,
}

/// Metadata one registered tool exposes to the Tool Adapter for schema
/// synthesis (§4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRegistration {
    pub id: String,
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

/// Consumed collaborator: the catalog of tools available to this task.
pub trait ToolRegistry: Send + Sync {
    fn get(&self, tool_name: &str) -> Option<ToolRegistration>;
    fn tools(&self) -> Vec<ToolRegistration>;
}

/// Working directory + cancellation passed through to one tool invocation.
#[derive(Clone)]
pub struct ExecutionContext {
    pub cancellation: CancelToken,
    pub working_directory: Option<String>,
}

/// Raw outcome of one tool invocation, before the Normalizer shapes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub is_successful: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub error_message: Option<String>,
    pub message: Option<String>,
}

/// Consumed collaborator: executes one tool call with native parameters.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(
        &self,
        tool_name: &str,
        params: serde_json::Value,
        context: ExecutionContext,
    ) -> ExecutionResult;
}

/// One tool call surfaced by the LLM in a completion response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmToolCall {
    pub id: String,
    pub name: String,
    pub arguments_json: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssistantMessage {
    pub content: String,
    pub tool_calls: Vec<LlmToolCall>,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<crate::message::ToolDefinition>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub assistant_message: AssistantMessage,
    pub usage: LlmUsage,
    pub finish_reason: String,
    pub model: String,
}

/// Consumed collaborator: the LLM transport. Used independently by the
/// Planner and the Critic.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;
}

/// Exposed collaborator contract: a pluggable backend for `AgentState`
/// checkpoints, keyed by trace identifier.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn load(&self, trace_id: &TraceId) -> Result<Option<AgentState>>;
    async fn save(&self, trace_id: &TraceId, state: &AgentState) -> Result<()>;
    async fn delete(&self, trace_id: &TraceId) -> Result<()>;
}
