use serde::Serialize;

/// Structured trace events emitted across the orchestrator crates.
///
/// Every lifecycle signal the engine produces — turn sequencing, tool
/// dispatch, policy resolution, state checkpoints — is one variant here.
/// `emit()` is the only place that talks to `tracing`; callers never format
/// a log line by hand.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    TurnStarted {
        trace_id: String,
        turn: u64,
    },
    TurnCompleted {
        trace_id: String,
        turn: u64,
        action_type: String,
    },
    ToolCalled {
        trace_id: String,
        tool_name: String,
        attempt: u32,
    },
    ToolRetried {
        trace_id: String,
        tool_name: String,
        attempt: u32,
        delay_ms: u64,
    },
    PolicyDecision {
        trace_id: String,
        turn: u64,
        action_type: String,
    },
    CritiqueRecorded {
        trace_id: String,
        turn: u64,
        goal_satisfied: bool,
        recommendation: String,
    },
    StateCheckpointed {
        trace_id: String,
        turn: u64,
        working_memory_entries: usize,
    },
    TaskStopped {
        trace_id: String,
        turn: u64,
        success: bool,
        stop_reason: String,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "ao_event");
    }
}
