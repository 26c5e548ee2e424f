//! The State Manager (§4.4): produces the next `AgentState` from the
//! current one plus this turn's action, observation and critique, and
//! enforces working-memory compression.

use ao_domain::action::AgentAction;
use ao_domain::critique::Critique;
use ao_domain::observation::Observation;
use ao_domain::ordered_map::OrderedMap;
use ao_domain::state::AgentState;
use ao_normalizer::truncate_with_ellipsis;
use serde::{Deserialize, Serialize};

/// Keys that survive compression regardless of recency.
const IMPORTANT_KEYS: &[&str] = &["stop_reason", "critique_assessment", "known_gaps", "user_query"];

/// Parse the turn index out of a `turn_<n>_summary` key for numeric
/// (not lexicographic) recency ordering during compression.
fn turn_index_of(key: &str) -> u64 {
    key.strip_prefix("turn_")
        .and_then(|rest| rest.split('_').next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkingMemoryConfig {
    #[serde(default = "d_max_memory_entries")]
    pub max_memory_entries: usize,
    #[serde(default = "d_max_turn_summaries")]
    pub max_turn_summaries: usize,
    #[serde(default = "d_max_facts_in_memory")]
    pub max_facts_in_memory: usize,
    #[serde(default = "d_max_memory_value_length")]
    pub max_memory_value_length: usize,
}

impl Default for WorkingMemoryConfig {
    fn default() -> Self {
        Self {
            max_memory_entries: d_max_memory_entries(),
            max_turn_summaries: d_max_turn_summaries(),
            max_facts_in_memory: d_max_facts_in_memory(),
            max_memory_value_length: d_max_memory_value_length(),
        }
    }
}

fn d_max_memory_entries() -> usize {
    50
}
fn d_max_turn_summaries() -> usize {
    10
}
fn d_max_facts_in_memory() -> usize {
    20
}
fn d_max_memory_value_length() -> usize {
    500
}

pub struct StateManager {
    config: WorkingMemoryConfig,
}

impl StateManager {
    pub fn new(config: WorkingMemoryConfig) -> Self {
        Self { config }
    }

    /// Create the initial state for a fresh task run.
    pub fn initial_state(
        &self,
        trace_id: impl Into<String>,
        goal: ao_domain::goal::AgentGoal,
        budget: ao_domain::goal::Budget,
    ) -> AgentState {
        AgentState::new(trace_id, goal, budget)
    }

    /// Fold one turn's action/observation/critique into `current`, producing
    /// the state for the next turn.
    pub fn next_state(
        &self,
        current: &AgentState,
        action: &AgentAction,
        observation: Option<&Observation>,
        critique: Option<&Critique>,
    ) -> AgentState {
        let mut next = current.clone();
        next.turn_index += 1;

        match action {
            AgentAction::CallTool { call, .. } => {
                next.last_action = Some(action.clone());
                let _ = call;
            }
            AgentAction::Replan { new_subgoals } => {
                next.subgoals = new_subgoals.clone();
                next.working_memory.insert("replan", new_subgoals.join("; "));
                next.last_action = Some(action.clone());
            }
            AgentAction::AskUser { question, .. } => {
                next.working_memory.insert("user_query", question.clone());
                next.last_action = Some(action.clone());
            }
            AgentAction::Stop { reason } => {
                next.working_memory.insert("stop_reason", reason.clone());
                next.last_action = Some(action.clone());
            }
        }

        next.last_observation = observation.cloned();

        if let Some(observation) = observation {
            for (key, value) in observation.key_facts.iter().take(self.config.max_facts_in_memory) {
                next.working_memory.insert(
                    format!("fact_{key}"),
                    truncate_with_ellipsis(value, self.config.max_memory_value_length),
                );
            }
            next.working_memory.insert(
                format!("turn_{}_summary", next.turn_index),
                truncate_with_ellipsis(&observation.summary, self.config.max_memory_value_length),
            );
        }

        if let Some(critique) = critique {
            next.working_memory.insert(
                "critique_assessment",
                truncate_with_ellipsis(&critique.assessment, self.config.max_memory_value_length),
            );
            next.working_memory.insert("known_gaps", critique.known_gaps.join(", "));
        }

        self.compress(&mut next.working_memory);
        next
    }

    fn compress(&self, memory: &mut OrderedMap) {
        if memory.len() <= self.config.max_memory_entries {
            return;
        }

        let important: Vec<(String, String)> = memory
            .iter()
            .filter(|(k, _)| IMPORTANT_KEYS.contains(k))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let mut turn_entries: Vec<(String, String)> = memory
            .iter()
            .filter(|(k, _)| k.starts_with("turn_"))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        turn_entries.sort_by_key(|(k, _)| std::cmp::Reverse(turn_index_of(k)));
        turn_entries.truncate(self.config.max_turn_summaries);

        let mut fact_entries: Vec<(String, String)> = memory
            .iter()
            .filter(|(k, _)| k.starts_with("fact_"))
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        fact_entries.truncate(self.config.max_facts_in_memory);

        let mut retained = important;
        retained.extend(turn_entries);
        retained.extend(fact_entries);
        memory.retain_ordered(retained);
    }
}
