//! The Critic (§4.6): judges whether the latest observation advances the
//! goal, by asking the LLM for a structured verdict.

use std::sync::Arc;

use ao_domain::collaborators::{CompletionRequest, LlmProvider};
use ao_domain::critique::Critique;
use ao_domain::error::{Error, Result};
use ao_domain::goal::AgentGoal;
use ao_domain::message::Message;
use ao_domain::observation::Observation;

const SYSTEM_PROMPT: &str = "You are the critic in an autonomous agent loop. \
Given the goal, its constraints, and the latest tool observation, judge whether \
the goal has been satisfied. Respond with a single JSON object with exactly \
these fields: goal_satisfied (bool), assessment (string), known_gaps (array of \
strings), recommendation (one of \"continue\", \"replan\", \"clarify\", \"stop\", \"retry\"). \
Respond with JSON only, no prose.";

pub struct Critic {
    provider: Arc<dyn LlmProvider>,
}

impl Critic {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    pub async fn assess(&self, goal: &AgentGoal, observation: &Observation) -> Result<Critique> {
        let key_facts_json = serde_json::to_string(&observation.key_facts.iter().collect::<Vec<_>>())
            .unwrap_or_default();

        let user_prompt = format!(
            "Goal: {}\nConstraints: {}\n\nObservation summary: {}\nKey facts: {}\nAffordances: {}",
            goal.text,
            goal.constraints.join("; "),
            observation.summary,
            key_facts_json,
            observation.affordances.join(", "),
        );

        let request = CompletionRequest {
            messages: vec![Message::system(SYSTEM_PROMPT), Message::user(user_prompt)],
            tools: vec![],
            temperature: Some(0.0),
            max_tokens: Some(400),
        };

        let response = self.provider.complete(request).await?;
        let raw = response.assistant_message.content;
        let json_text = strip_fence(&raw);

        serde_json::from_str(json_text).map_err(|e| {
            tracing::warn!(error = %e, raw = %raw, "critic response failed to parse as JSON");
            Error::Other(format!("critic response is not valid JSON: {e}"))
        })
    }
}

/// Strip a surrounding ```json ... ``` or ``` ... ``` fence, if present.
fn strip_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_prefix('\n').unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ao_domain::collaborators::{AssistantMessage, CompletionResponse, LlmUsage};
    use async_trait::async_trait;

    struct FixedProvider {
        content: String,
    }

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse> {
            Ok(CompletionResponse {
                assistant_message: AssistantMessage {
                    content: self.content.clone(),
                    tool_calls: vec![],
                },
                usage: LlmUsage::default(),
                finish_reason: "stop".to_string(),
                model: "mock".to_string(),
            })
        }
    }

    fn goal() -> AgentGoal {
        AgentGoal::new("find the weather in Boston", vec![])
    }

    fn observation() -> Observation {
        Observation {
            summary: "Tool 'get_weather' executed successfully".to_string(),
            key_facts: ao_domain::ordered_map::OrderedMap::new(),
            affordances: vec![],
            raw: ao_domain::tool_spec::ToolResult::success(
                "get_weather",
                serde_json::json!({"temp_f": 72}),
                1,
                std::time::Duration::ZERO,
            ),
        }
    }

    #[tokio::test]
    async fn parses_bare_json_response() {
        let provider = Arc::new(FixedProvider {
            content: r#"{"goal_satisfied": true, "assessment": "done", "known_gaps": [], "recommendation": "stop"}"#.to_string(),
        });
        let critic = Critic::new(provider);
        let critique = critic.assess(&goal(), &observation()).await.unwrap();
        assert!(critique.goal_satisfied);
        assert_eq!(critique.recommendation, ao_domain::critique::Recommendation::Stop);
    }

    #[tokio::test]
    async fn strips_fenced_json_response() {
        let provider = Arc::new(FixedProvider {
            content: "```json\n{\"goal_satisfied\": false, \"assessment\": \"needs more\", \"known_gaps\": [\"missing units\"], \"recommendation\": \"continue\"}\n```".to_string(),
        });
        let critic = Critic::new(provider);
        let critique = critic.assess(&goal(), &observation()).await.unwrap();
        assert!(!critique.goal_satisfied);
        assert_eq!(critique.known_gaps, vec!["missing units".to_string()]);
    }

    #[tokio::test]
    async fn unparseable_response_is_fatal() {
        let provider = Arc::new(FixedProvider { content: "not json at all".to_string() });
        let critic = Critic::new(provider);
        let result = critic.assess(&goal(), &observation()).await;
        assert!(result.is_err());
    }

    #[test]
    fn strip_fence_handles_plain_fence_without_language_tag() {
        let raw = "```\n{\"a\": 1}\n```";
        assert_eq!(strip_fence(raw), "{\"a\": 1}");
    }

    #[test]
    fn strip_fence_passes_through_unfenced_text() {
        assert_eq!(strip_fence("{\"a\": 1}"), "{\"a\": 1}");
    }
}
