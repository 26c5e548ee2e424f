use serde::{Deserialize, Serialize};

/// What the Critic recommends doing next, given the latest observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Continue,
    Replan,
    Clarify,
    Stop,
    Retry,
}

/// The Critic's judgment of one observation against the goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Critique {
    pub goal_satisfied: bool,
    pub assessment: String,
    pub known_gaps: Vec<String>,
    pub recommendation: Recommendation,
}
