//! The Turn Loop (§4.1): composes Planner, Policy Engine, Tool Adapter,
//! Observation Normalizer, Critic and State Manager into `run()`.
//!
//! The loop itself owns no retry or I/O-shaping logic beyond sequencing —
//! it is a thin driver over the other components, walking
//! prepare -> dispatch -> finalize each turn with a single designated
//! finalizer path (`terminal`) for success, failure, and cancellation alike.

pub mod config;
pub mod error;

use std::sync::Arc;
use std::time::Instant;

use ao_critic::Critic;
use ao_domain::action::{AgentAction, PlannerDecision};
use ao_domain::cancel::CancelToken;
use ao_domain::collaborators::{LlmProvider, StateStore, ToolExecutor, ToolRegistry};
use ao_domain::critique::Recommendation;
use ao_domain::goal::{AgentGoal, Budget, ErrorHandlingPolicy};
use ao_domain::result::{AgentResult, LifecycleEvent};
use ao_domain::state::{new_trace_id, AgentState};
use ao_domain::trace::TraceEvent;
use ao_normalizer::NormalizerConfig;
use ao_planner::Planner;
use ao_policy::PolicyEngine;
use ao_state::StateManager;
use ao_tool_adapter::ToolAdapter;
use tokio::sync::mpsc::UnboundedSender;

pub use config::EngineConfig;
pub use error::{OrchestratorError, Result};

/// Composes the six components into one task-scoped supervisor. One
/// `Orchestrator` can drive many sequential `run()` calls; it holds no
/// per-task state of its own beyond what each `run()` call constructs.
pub struct Orchestrator {
    planner: Planner,
    critic: Critic,
    tool_adapter: ToolAdapter,
    state_manager: StateManager,
    state_store: Arc<dyn StateStore>,
    normalizer_config: NormalizerConfig,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tool_registry: Arc<dyn ToolRegistry>,
        tool_executor: Arc<dyn ToolExecutor>,
        state_store: Arc<dyn StateStore>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            planner: Planner::new(provider.clone(), tool_registry.clone()),
            critic: Critic::new(provider),
            tool_adapter: ToolAdapter::new(tool_registry, tool_executor),
            state_manager: StateManager::new(config.working_memory),
            state_store,
            normalizer_config: config.normalizer,
        }
    }

    /// Drive one task to completion. Never propagates an `Err` — every
    /// failure mode (planner/critic errors, a poisoned state store, a
    /// malformed state file) is folded into a terminal `AgentResult` with
    /// `success = false`, per the "no panics at the orchestrator boundary"
    /// rule.
    pub async fn run(
        &self,
        goal: AgentGoal,
        budget: Budget,
        error_policy: ErrorHandlingPolicy,
        cancellation: CancelToken,
        events: Option<UnboundedSender<LifecycleEvent>>,
    ) -> AgentResult {
        let trace_id = new_trace_id();
        let started_at = Instant::now();
        let mut state = self.state_manager.initial_state(trace_id.clone(), goal, budget);
        let mut policy_engine = PolicyEngine::new();

        loop {
            if cancellation.is_cancelled() {
                return self.terminal(state, false, "Cancelled".to_string(), started_at, &trace_id).await;
            }

            if state.budget.exhausted(state.turn_index, started_at) {
                // No planner/tool/critic work happens on this check, so it is
                // not a completed turn: record the reason without bumping
                // `turn_index` (`next_state` always increments it) and without
                // emitting a `TurnStarted` for a turn that never ran.
                state.working_memory.insert("stop_reason", "Budget exhausted".to_string());
                let _ = self.state_store.save(&trace_id, &state).await;
                return self.terminal(state, false, "Budget exhausted".to_string(), started_at, &trace_id).await;
            }

            TraceEvent::TurnStarted { trace_id: trace_id.clone(), turn: state.turn_index }.emit();
            emit(&events, LifecycleEvent::TurnStarted { turn: state.turn_index });

            let decision = match self.planner.decide(&state).await {
                Ok(decision) => decision,
                Err(e) => {
                    return self
                        .terminal(state, false, format!("planner error: {e}"), started_at, &trace_id)
                        .await
                }
            };

            let action = policy_engine.resolve(decision.clone(), state.last_observation.as_ref(), &error_policy, false);
            TraceEvent::PolicyDecision {
                trace_id: trace_id.clone(),
                turn: state.turn_index,
                action_type: action.type_name().to_string(),
            }
            .emit();

            match dispatch_outcome(action, decision) {
                Dispatch::CallTool { call, attempt } => {
                    TraceEvent::ToolCalled { trace_id: trace_id.clone(), tool_name: call.tool_name.clone(), attempt }
                        .emit();
                    emit(&events, LifecycleEvent::ToolCalled { tool_name: call.tool_name.clone() });

                    let result = self.tool_adapter.execute(&call, &trace_id, cancellation.clone()).await;
                    let observation = ao_normalizer::normalize(&result, &self.normalizer_config);
                    let action = AgentAction::CallTool { call, retry_attempt: attempt };

                    let critique = match self.critic.assess(&state.goal, &observation).await {
                        Ok(critique) => critique,
                        Err(e) => {
                            state = self.state_manager.next_state(&state, &action, Some(&observation), None);
                            let _ = self.state_store.save(&trace_id, &state).await;
                            return self
                                .terminal(state, false, format!("critic error: {e}"), started_at, &trace_id)
                                .await;
                        }
                    };

                    state = self.state_manager.next_state(&state, &action, Some(&observation), Some(&critique));
                    TraceEvent::CritiqueRecorded {
                        trace_id: trace_id.clone(),
                        turn: state.turn_index,
                        goal_satisfied: critique.goal_satisfied,
                        recommendation: format!("{:?}", critique.recommendation),
                    }
                    .emit();

                    if let Err(e) = self.state_store.save(&trace_id, &state).await {
                        return self
                            .terminal(state, false, format!("state store error: {e}"), started_at, &trace_id)
                            .await;
                    }

                    emit(&events, LifecycleEvent::TurnCompleted { turn: state.turn_index, action_type: action.type_name().to_string() });
                    TraceEvent::TurnCompleted {
                        trace_id: trace_id.clone(),
                        turn: state.turn_index,
                        action_type: action.type_name().to_string(),
                    }
                    .emit();

                    if critique.recommendation == Recommendation::Stop {
                        let reason = format!("Goal satisfied: {}", critique.assessment);
                        return self.terminal(state, true, reason, started_at, &trace_id).await;
                    }
                    // Continue, Replan, Clarify, Retry: fold the critique into
                    // working memory (already done above) and let the next
                    // planner turn decide; the critic does not itself issue
                    // tool calls or pose user questions.
                }
                Dispatch::AskUser { question } => {
                    let action = AgentAction::AskUser { question: question.clone(), missing_fields: vec![] };
                    state = self.state_manager.next_state(&state, &action, None, None);
                    let _ = self.state_store.save(&trace_id, &state).await;
                    emit(&events, LifecycleEvent::TurnCompleted { turn: state.turn_index, action_type: "ask_user".to_string() });
                    return self
                        .terminal(state, false, format!("{question} (awaiting user response)"), started_at, &trace_id)
                        .await;
                }
                Dispatch::Replan { new_subgoals } => {
                    let action = AgentAction::Replan { new_subgoals };
                    state = self.state_manager.next_state(&state, &action, None, None);
                    if let Err(e) = self.state_store.save(&trace_id, &state).await {
                        return self
                            .terminal(state, false, format!("state store error: {e}"), started_at, &trace_id)
                            .await;
                    }
                    emit(&events, LifecycleEvent::TurnCompleted { turn: state.turn_index, action_type: "replan".to_string() });
                }
                Dispatch::Stop { reason, planner_initiated } => {
                    let action = AgentAction::Stop { reason: reason.clone() };
                    state = self.state_manager.next_state(&state, &action, None, None);
                    let _ = self.state_store.save(&trace_id, &state).await;
                    return self.terminal(state, planner_initiated, reason, started_at, &trace_id).await;
                }
            }
        }
    }

    async fn terminal(&self, final_state: AgentState, success: bool, stop_reason: String, started_at: Instant, trace_id: &str) -> AgentResult {
        TraceEvent::TaskStopped {
            trace_id: trace_id.to_string(),
            turn: final_state.turn_index,
            success,
            stop_reason: stop_reason.clone(),
        }
        .emit();

        AgentResult {
            success,
            stop_reason,
            total_turns: final_state.turn_index,
            duration: started_at.elapsed(),
            final_state,
        }
    }
}

/// Collapses `AgentAction` plus the originating `PlannerDecision` (needed
/// only to tell a planner-initiated `Stop` apart from one the Policy Engine
/// forced) into the shape the turn loop dispatches on.
enum Dispatch {
    CallTool { call: ao_domain::tool_spec::ToolCall, attempt: u32 },
    AskUser { question: String },
    Replan { new_subgoals: Vec<String> },
    Stop { reason: String, planner_initiated: bool },
}

fn dispatch_outcome(action: AgentAction, decision: PlannerDecision) -> Dispatch {
    match action {
        AgentAction::CallTool { call, retry_attempt } => Dispatch::CallTool { call, attempt: retry_attempt },
        AgentAction::AskUser { question, .. } => Dispatch::AskUser { question },
        AgentAction::Replan { new_subgoals } => Dispatch::Replan { new_subgoals },
        AgentAction::Stop { reason } => Dispatch::Stop {
            reason,
            planner_initiated: matches!(decision, PlannerDecision::Stop { .. }),
        },
    }
}

fn emit(events: &Option<UnboundedSender<LifecycleEvent>>, event: LifecycleEvent) {
    if let Some(sender) = events {
        let _ = sender.send(event);
    }
}
