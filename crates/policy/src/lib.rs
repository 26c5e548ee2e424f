//! The Policy Engine (§4.3): a pure decision function from
//! `(PlannerDecision, last Observation, ErrorHandlingPolicy)` to `AgentAction`,
//! plus the one piece of state it owns across turns — the per-tool retry
//! counter map.

mod missing_fields;

use std::collections::HashMap;

use ao_domain::action::{AgentAction, PlannerDecision};
use ao_domain::goal::ErrorHandlingPolicy;
use ao_domain::observation::Observation;
use ao_domain::tool_spec::ErrorCode;

pub use missing_fields::extract_missing_fields;

/// Owns the per-tool retry counters that span turns. One instance per task.
#[derive(Debug, Default)]
pub struct PolicyEngine {
    retry_counters: HashMap<String, u32>,
}

impl PolicyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve one turn's `PlannerDecision` into an `AgentAction`, per the
    /// ordered rules in §4.3.
    pub fn resolve(
        &mut self,
        decision: PlannerDecision,
        last_observation: Option<&Observation>,
        policy: &ErrorHandlingPolicy,
        budget_exhausted: bool,
    ) -> AgentAction {
        if budget_exhausted {
            return AgentAction::Stop {
                reason: "Budget exhausted".to_string(),
            };
        }

        match decision {
            PlannerDecision::AskUser { question, missing_fields } => {
                AgentAction::AskUser { question, missing_fields }
            }
            PlannerDecision::Stop { reason } => AgentAction::Stop { reason },
            PlannerDecision::Replan { new_subgoals } => AgentAction::Replan { new_subgoals },
            PlannerDecision::CallTool(call) => self.resolve_call_tool(call, last_observation, policy),
        }
    }

    fn resolve_call_tool(
        &mut self,
        call: ao_domain::tool_spec::ToolCall,
        last_observation: Option<&Observation>,
        policy: &ErrorHandlingPolicy,
    ) -> AgentAction {
        let tool_name = call.tool_name.clone();

        let last_was_failure = last_observation.is_some_and(|o| !o.raw.ok);
        if !last_was_failure {
            self.retry_counters.remove(&tool_name);
            return AgentAction::CallTool { call, retry_attempt: 0 };
        }

        let observation = last_observation.expect("checked above");
        let internal_count = *self.retry_counters.get(&tool_name).unwrap_or(&0);
        let effective_attempt = internal_count.max(observation.raw.attempt.saturating_sub(1));

        let error_code = observation.raw.error_code;
        if error_code.is_retryable() && effective_attempt < policy.max_retries {
            let next_attempt = effective_attempt + 1;
            self.retry_counters.insert(tool_name, next_attempt);
            return AgentAction::CallTool { call, retry_attempt: next_attempt };
        }

        if policy.use_fallbacks {
            if let Some(fallback_name) = policy.fallbacks.get(&tool_name) {
                self.retry_counters.remove(&tool_name);
                return AgentAction::CallTool {
                    call: ao_domain::tool_spec::ToolCall::new(fallback_name.clone(), call.arguments),
                    retry_attempt: 0,
                };
            }
        }

        if policy.ask_user_on_missing_fields && error_code == ErrorCode::InvalidInput {
            let details = observation.raw.error_details.clone().unwrap_or_default();
            let missing_fields = extract_missing_fields(&details);
            return AgentAction::AskUser {
                question: format!("I need more information to call '{tool_name}': {details}"),
                missing_fields,
            };
        }

        AgentAction::Stop {
            reason: format!("Max retries exceeded after {effective_attempt} attempts: {error_code:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ao_domain::ordered_map::OrderedMap;
    use ao_domain::tool_spec::{ToolCall, ToolResult};
    use std::time::Duration;

    fn failed_observation(error_code: ErrorCode, attempt: u32) -> Observation {
        Observation {
            summary: "failed".to_string(),
            key_facts: OrderedMap::new(),
            affordances: vec![],
            raw: ToolResult::failure("search_web", error_code, "boom", attempt, Duration::ZERO),
        }
    }

    #[test]
    fn budget_exhausted_always_stops() {
        let mut engine = PolicyEngine::new();
        let action = engine.resolve(
            PlannerDecision::CallTool(ToolCall::new("x", serde_json::json!({}))),
            None,
            &ErrorHandlingPolicy::default(),
            true,
        );
        assert!(matches!(action, AgentAction::Stop { reason } if reason == "Budget exhausted"));
    }

    #[test]
    fn fresh_call_with_no_prior_observation_resets_attempt() {
        let mut engine = PolicyEngine::new();
        let action = engine.resolve(
            PlannerDecision::CallTool(ToolCall::new("search_web", serde_json::json!({}))),
            None,
            &ErrorHandlingPolicy::default(),
            false,
        );
        assert!(matches!(action, AgentAction::CallTool { retry_attempt: 0, .. }));
    }

    #[test]
    fn retries_retryable_error_under_max() {
        let mut engine = PolicyEngine::new();
        let policy = ErrorHandlingPolicy { max_retries: 3, ..ErrorHandlingPolicy::default() };
        let obs = failed_observation(ErrorCode::Timeout, 1);
        let action = engine.resolve(
            PlannerDecision::CallTool(ToolCall::new("search_web", serde_json::json!({}))),
            Some(&obs),
            &policy,
            false,
        );
        assert!(matches!(action, AgentAction::CallTool { retry_attempt: 1, .. }));
    }

    #[test]
    fn falls_back_when_retries_exhausted() {
        let mut engine = PolicyEngine::new();
        let mut policy = ErrorHandlingPolicy { max_retries: 0, ..ErrorHandlingPolicy::default() };
        policy.fallbacks.insert("search_web".to_string(), "search_local".to_string());
        let obs = failed_observation(ErrorCode::RetryableServer, 3);
        let action = engine.resolve(
            PlannerDecision::CallTool(ToolCall::new("search_web", serde_json::json!({"q": "rust"}))),
            Some(&obs),
            &policy,
            false,
        );
        match action {
            AgentAction::CallTool { call, retry_attempt } => {
                assert_eq!(call.tool_name, "search_local");
                assert_eq!(retry_attempt, 0);
                assert_eq!(call.arguments, serde_json::json!({"q": "rust"}));
            }
            other => panic!("expected fallback CallTool, got {other:?}"),
        }
    }

    #[test]
    fn asks_user_on_missing_fields_when_configured() {
        let mut engine = PolicyEngine::new();
        let policy = ErrorHandlingPolicy { max_retries: 0, use_fallbacks: false, ..ErrorHandlingPolicy::default() };
        let mut obs = failed_observation(ErrorCode::InvalidInput, 1);
        obs.raw.error_details = Some("required property 'query' is missing".to_string());
        let action = engine.resolve(
            PlannerDecision::CallTool(ToolCall::new("search_web", serde_json::json!({}))),
            Some(&obs),
            &policy,
            false,
        );
        match action {
            AgentAction::AskUser { question, missing_fields } => {
                assert!(question.contains("query"));
                assert_eq!(missing_fields, vec!["query".to_string()]);
            }
            other => panic!("expected AskUser, got {other:?}"),
        }
    }

    #[test]
    fn stops_when_no_recovery_path_applies() {
        let mut engine = PolicyEngine::new();
        let policy = ErrorHandlingPolicy {
            max_retries: 0,
            use_fallbacks: false,
            ask_user_on_missing_fields: false,
            ..ErrorHandlingPolicy::default()
        };
        let obs = failed_observation(ErrorCode::ToolBug, 1);
        let action = engine.resolve(
            PlannerDecision::CallTool(ToolCall::new("search_web", serde_json::json!({}))),
            Some(&obs),
            &policy,
            false,
        );
        assert!(matches!(action, AgentAction::Stop { .. }));
    }

    #[test]
    fn effective_attempt_uses_max_of_internal_and_observation() {
        let mut engine = PolicyEngine::new();
        let policy = ErrorHandlingPolicy { max_retries: 5, ..ErrorHandlingPolicy::default() };
        // Observation reports attempt=4 (adapter retried internally up to 3
        // times), while our own counter is still at 0: effective attempt
        // should be max(0, 4-1) = 3, not 0.
        let obs = failed_observation(ErrorCode::Timeout, 4);
        let action = engine.resolve(
            PlannerDecision::CallTool(ToolCall::new("search_web", serde_json::json!({}))),
            Some(&obs),
            &policy,
            false,
        );
        assert!(matches!(action, AgentAction::CallTool { retry_attempt: 4, .. }));
    }
}
