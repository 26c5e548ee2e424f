use serde::{Deserialize, Serialize};

use crate::tool_spec::ToolCall;

/// What the Planner decided to do this turn, before policy resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PlannerDecision {
    CallTool(ToolCall),
    AskUser {
        question: String,
        missing_fields: Vec<String>,
    },
    Stop {
        reason: String,
    },
    Replan {
        new_subgoals: Vec<String>,
    },
}

/// What the turn loop actually does this turn, after policy resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AgentAction {
    CallTool {
        call: ToolCall,
        retry_attempt: u32,
    },
    AskUser {
        question: String,
        missing_fields: Vec<String>,
    },
    Stop {
        reason: String,
    },
    Replan {
        new_subgoals: Vec<String>,
    },
}

impl AgentAction {
    /// Short tag used in lifecycle events and logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            AgentAction::CallTool { .. } => "call_tool",
            AgentAction::AskUser { .. } => "ask_user",
            AgentAction::Stop { .. } => "stop",
            AgentAction::Replan { .. } => "replan",
        }
    }
}
