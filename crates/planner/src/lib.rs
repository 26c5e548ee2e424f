//! The Planner adapter: turns the current `AgentState` into a
//! `PlannerDecision` by asking the LLM, with tools from the `ToolRegistry`
//! surfaced as callable functions.

use std::sync::Arc;

use ao_domain::action::PlannerDecision;
use ao_domain::collaborators::{CompletionRequest, LlmProvider, ToolRegistry};
use ao_domain::error::Result;
use ao_domain::message::{Message, ToolDefinition};
use ao_domain::state::AgentState;
use ao_domain::tool_spec::ToolCall;

/// Case-insensitive prefixes that, absent a tool call, are read as "the
/// model believes the goal is done."
const STOP_PHRASES: &[&str] = &["done", "stop", "finished", "complete", "goal achieved", "task complete"];

pub struct Planner {
    provider: Arc<dyn LlmProvider>,
    tool_registry: Arc<dyn ToolRegistry>,
}

impl Planner {
    pub fn new(provider: Arc<dyn LlmProvider>, tool_registry: Arc<dyn ToolRegistry>) -> Self {
        Self { provider, tool_registry }
    }

    pub async fn decide(&self, state: &AgentState) -> Result<PlannerDecision> {
        let tools: Vec<ToolDefinition> = self
            .tool_registry
            .tools()
            .into_iter()
            .map(|registration| ToolDefinition {
                name: registration.name.clone(),
                description: registration.description.clone(),
                parameters: ao_tool_adapter::synthesize_input_schema(&registration),
            })
            .collect();

        let request = CompletionRequest {
            messages: build_messages(state),
            tools,
            temperature: Some(0.2),
            max_tokens: Some(800),
        };

        let response = self.provider.complete(request).await?;
        Ok(map_response(response.assistant_message))
    }
}

fn build_messages(state: &AgentState) -> Vec<Message> {
    let system = "You are the planner in an autonomous agent loop. Given the goal, its \
        constraints, and the working memory accumulated so far, either call exactly one \
        tool, or reply with plain text. If the goal has been achieved, reply with plain \
        text beginning with \"done\" or \"stop\".";

    let memory: String = state
        .working_memory
        .iter()
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Goal: {}\nConstraints: {}\nSubgoals: {}\n\nWorking memory:\n{}",
        state.goal.text,
        state.goal.constraints.join("; "),
        state.subgoals.join("; "),
        memory,
    );

    vec![Message::system(system), Message::user(user)]
}

fn map_response(message: ao_domain::collaborators::AssistantMessage) -> PlannerDecision {
    if let Some(first_call) = message.tool_calls.first() {
        let arguments = serde_json::from_str(&first_call.arguments_json).unwrap_or(serde_json::Value::Null);
        return PlannerDecision::CallTool(ToolCall::new(first_call.name.clone(), arguments));
    }

    let content = message.content.trim();
    let lowered = content.to_ascii_lowercase();
    if STOP_PHRASES.iter().any(|phrase| lowered.starts_with(phrase)) {
        return PlannerDecision::Stop { reason: content.to_string() };
    }

    PlannerDecision::AskUser {
        question: content.to_string(),
        missing_fields: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ao_domain::collaborators::{
        AssistantMessage, CompletionResponse, LlmToolCall, LlmUsage, ToolParameter, ToolRegistration,
    };
    use async_trait::async_trait;

    struct FixedProvider {
        response: CompletionResponse,
    }

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            Ok(self.response.clone())
        }
    }

    struct EmptyRegistry;
    impl ToolRegistry for EmptyRegistry {
        fn get(&self, _tool_name: &str) -> Option<ToolRegistration> {
            None
        }
        fn tools(&self) -> Vec<ToolRegistration> {
            vec![ToolRegistration {
                id: "search_web".into(),
                name: "search_web".into(),
                description: "search the web".into(),
                parameters: vec![ToolParameter {
                    name: "query".into(),
                    type_keyword: "string".into(),
                    description: "".into(),
                    required: true,
                    default: None,
                    allowed_values: vec![],
                }],
            }]
        }
    }

    fn state() -> ao_domain::state::AgentState {
        ao_domain::state::AgentState::new(
            "trace-1",
            ao_domain::goal::AgentGoal::new("find news about rust", vec![]),
            ao_domain::goal::Budget::default(),
        )
    }

    #[tokio::test]
    async fn tool_call_response_maps_to_call_tool() {
        let response = CompletionResponse {
            assistant_message: AssistantMessage {
                content: String::new(),
                tool_calls: vec![LlmToolCall {
                    id: "call-1".into(),
                    name: "search_web".into(),
                    arguments_json: r#"{"query": "rust news"}"#.into(),
                }],
            },
            usage: LlmUsage::default(),
            finish_reason: "tool_calls".into(),
            model: "mock".into(),
        };
        let planner = Planner::new(Arc::new(FixedProvider { response }), Arc::new(EmptyRegistry));
        let decision = planner.decide(&state()).await.unwrap();
        match decision {
            PlannerDecision::CallTool(call) => {
                assert_eq!(call.tool_name, "search_web");
                assert_eq!(call.arguments, serde_json::json!({"query": "rust news"}));
            }
            other => panic!("expected CallTool, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stop_phrase_without_tool_call_maps_to_stop() {
        let response = CompletionResponse {
            assistant_message: AssistantMessage {
                content: "Done, I found the relevant article.".into(),
                tool_calls: vec![],
            },
            usage: LlmUsage::default(),
            finish_reason: "stop".into(),
            model: "mock".into(),
        };
        let planner = Planner::new(Arc::new(FixedProvider { response }), Arc::new(EmptyRegistry));
        let decision = planner.decide(&state()).await.unwrap();
        assert!(matches!(decision, PlannerDecision::Stop { .. }));
    }

    #[tokio::test]
    async fn plain_text_without_stop_phrase_maps_to_ask_user() {
        let response = CompletionResponse {
            assistant_message: AssistantMessage {
                content: "What date range should I search within?".into(),
                tool_calls: vec![],
            },
            usage: LlmUsage::default(),
            finish_reason: "stop".into(),
            model: "mock".into(),
        };
        let planner = Planner::new(Arc::new(FixedProvider { response }), Arc::new(EmptyRegistry));
        let decision = planner.decide(&state()).await.unwrap();
        match decision {
            PlannerDecision::AskUser { question, missing_fields } => {
                assert!(question.contains("date range"));
                assert!(missing_fields.is_empty());
            }
            other => panic!("expected AskUser, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_tool_arguments_fall_back_to_null() {
        let response = CompletionResponse {
            assistant_message: AssistantMessage {
                content: String::new(),
                tool_calls: vec![LlmToolCall {
                    id: "call-1".into(),
                    name: "search_web".into(),
                    arguments_json: "not json".into(),
                }],
            },
            usage: LlmUsage::default(),
            finish_reason: "tool_calls".into(),
            model: "mock".into(),
        };
        let planner = Planner::new(Arc::new(FixedProvider { response }), Arc::new(EmptyRegistry));
        let decision = planner.decide(&state()).await.unwrap();
        match decision {
            PlannerDecision::CallTool(call) => assert_eq!(call.arguments, serde_json::Value::Null),
            other => panic!("expected CallTool, got {other:?}"),
        }
    }
}
