use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::AgentState;

/// Terminal outcome of `run()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    pub success: bool,
    pub stop_reason: String,
    pub total_turns: u64,
    pub duration: Duration,
    pub final_state: AgentState,
}

/// One entry in the lifecycle event stream exposed to callers (§6). Also
/// serialized through `TraceEvent` into the structured log.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    TurnStarted { turn: u64 },
    TurnCompleted { turn: u64, action_type: String },
    ToolCalled { tool_name: String },
}
