use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One tool invocation requested by the planner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Ten-way error taxonomy a `ToolResult` can carry. `None` means success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ErrorCode {
    None,
    InvalidInput,
    Timeout,
    RetryableServer,
    RateLimited,
    OutputSchemaMismatch,
    NoResults,
    ToolBug,
    Unauthorized,
    Forbidden,
    NotFound,
}

impl ErrorCode {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorCode::Timeout | ErrorCode::RetryableServer | ErrorCode::RateLimited
        )
    }
}

/// Result of one tool invocation attempt sequence. Feeds the Normalizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolResult {
    pub tool_name: String,
    pub ok: bool,
    pub data: Option<serde_json::Value>,
    pub error_code: ErrorCode,
    pub error_details: Option<String>,
    pub schema_validated: bool,
    pub attempt: u32,
    pub latency: Duration,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, data: serde_json::Value, attempt: u32, latency: Duration) -> Self {
        Self {
            tool_name: tool_name.into(),
            ok: true,
            data: Some(data),
            error_code: ErrorCode::None,
            error_details: None,
            schema_validated: true,
            attempt,
            latency,
        }
    }

    pub fn failure(
        tool_name: impl Into<String>,
        error_code: ErrorCode,
        details: impl Into<String>,
        attempt: u32,
        latency: Duration,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            ok: false,
            data: None,
            error_code,
            error_details: Some(details.into()),
            schema_validated: false,
            attempt,
            latency,
        }
    }
}

/// Backoff shape applied between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    None,
    Linear,
    Exponential,
    ExponentialWithJitter,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub strategy: BackoffStrategy,
    /// Only meaningful for `ExponentialWithJitter`.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_backoff: Duration::from_millis(100),
            strategy: BackoffStrategy::ExponentialWithJitter,
            jitter_factor: 0.2,
        }
    }
}

/// Everything the Tool Adapter needs to validate, invoke, and normalize one
/// tool. Constructed lazily from tool-registry metadata and cached by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub version: String,
    pub input_schema: serde_json::Value,
    pub output_schema: serde_json::Value,
    pub retry_policy: RetryPolicy,
    pub timeout: Duration,
    pub page_limit: Option<u32>,
    pub max_payload_bytes: Option<u64>,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, input_schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            version: "1".to_string(),
            input_schema,
            output_schema: serde_json::json!({"type": "object"}),
            retry_policy: RetryPolicy::default(),
            timeout: Duration::from_secs(30),
            page_limit: None,
            max_payload_bytes: None,
        }
    }
}
