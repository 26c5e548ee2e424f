use serde::{Deserialize, Serialize};

use crate::action::AgentAction;
use crate::goal::{AgentGoal, Budget};
use crate::observation::Observation;
use crate::ordered_map::OrderedMap;

/// Opaque identifier under which `AgentState` is persisted and resumed.
pub type TraceId = String;

/// The full checkpointable record of a task in progress. Replaced by a
/// functional update each turn; never mutated in place by callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub trace_id: TraceId,
    pub goal: AgentGoal,
    pub subgoals: Vec<String>,
    pub budget: Budget,
    pub turn_index: u64,
    pub last_action: Option<AgentAction>,
    pub last_observation: Option<Observation>,
    pub working_memory: OrderedMap,
}

impl AgentState {
    pub fn new(trace_id: impl Into<String>, goal: AgentGoal, budget: Budget) -> Self {
        Self {
            trace_id: trace_id.into(),
            goal,
            subgoals: Vec::new(),
            budget,
            turn_index: 0,
            last_action: None,
            last_observation: None,
            working_memory: OrderedMap::new(),
        }
    }
}

/// Generate a fresh trace identifier for a new task run.
pub fn new_trace_id() -> TraceId {
    uuid::Uuid::new_v4().to_string()
}
