use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The user's immutable task description, fixed at task start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentGoal {
    pub text: String,
    pub constraints: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl AgentGoal {
    pub fn new(text: impl Into<String>, constraints: Vec<String>) -> Self {
        Self {
            text: text.into(),
            constraints,
            created_at: Utc::now(),
        }
    }
}

/// Turn and wall-clock limits for one task run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Budget {
    #[serde(default = "d_max_turns")]
    pub max_turns: u64,
    #[serde(default = "d_max_wall_clock")]
    pub max_wall_clock: Duration,
}

fn d_max_turns() -> u64 {
    10
}
fn d_max_wall_clock() -> Duration {
    Duration::from_secs(300)
}

impl Budget {
    pub fn new(max_turns: u64, max_wall_clock: Duration) -> Self {
        Self {
            max_turns: max_turns.max(1),
            max_wall_clock,
        }
    }

    /// True once either limit has been reached.
    pub fn exhausted(&self, turn: u64, started_at: Instant) -> bool {
        turn >= self.max_turns || started_at.elapsed() >= self.max_wall_clock
    }
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_turns: 10,
            max_wall_clock: Duration::from_secs(300),
        }
    }
}

/// How the Policy Engine should resolve failures and ambiguity across turns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorHandlingPolicy {
    #[serde(default = "d_max_retries")]
    pub max_retries: u32,
    #[serde(default = "d_base_backoff")]
    pub base_backoff: Duration,
    #[serde(default = "d_use_fallbacks")]
    pub use_fallbacks: bool,
    #[serde(default = "d_ask_user_on_missing_fields")]
    pub ask_user_on_missing_fields: bool,
    /// Tool name -> fallback tool name, consulted when `use_fallbacks` is set.
    #[serde(default)]
    pub fallbacks: std::collections::HashMap<String, String>,
}

impl Default for ErrorHandlingPolicy {
    fn default() -> Self {
        Self {
            max_retries: d_max_retries(),
            base_backoff: d_base_backoff(),
            use_fallbacks: d_use_fallbacks(),
            ask_user_on_missing_fields: d_ask_user_on_missing_fields(),
            fallbacks: std::collections::HashMap::new(),
        }
    }
}

fn d_max_retries() -> u32 {
    2
}
fn d_base_backoff() -> Duration {
    Duration::from_millis(200)
}
fn d_use_fallbacks() -> bool {
    true
}
fn d_ask_user_on_missing_fields() -> bool {
    true
}

/// Numeric bounds that must stay sane under hand-edited config, clamped
/// rather than rejected (per the ambient config-validation convention).
impl ErrorHandlingPolicy {
    pub fn clamped(mut self) -> Self {
        self.max_retries = self.max_retries.min(20);
        self
    }
}
