//! The Tool Adapter (§4.2): validates, invokes, retries, times out, and
//! normalizes the output of exactly one `ToolCall`.

mod backoff;
mod classify;
mod schema;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ao_domain::cancel::CancelToken;
use ao_domain::collaborators::{ExecutionContext, ExecutionResult, ToolExecutor, ToolRegistry};
use ao_domain::tool_spec::{ErrorCode, ToolCall, ToolResult, ToolSpec};
use ao_domain::trace::TraceEvent;
use parking_lot::RwLock;

pub use backoff::delay_for_attempt;
pub use schema::synthesize_input_schema;

/// Executes one `ToolCall` end-to-end: validation, retry, timeout, output
/// normalization. Public contract: `execute(call, trace_id, cancellation) -> ToolResult`.
pub struct ToolAdapter {
    registry: Arc<dyn ToolRegistry>,
    executor: Arc<dyn ToolExecutor>,
    /// Synthesized specs are cached per tool name (§4.2, §5).
    spec_cache: RwLock<HashMap<String, Arc<ToolSpec>>>,
    /// Explicit specs override synthesis, keyed by tool name.
    explicit_specs: HashMap<String, ToolSpec>,
}

impl ToolAdapter {
    pub fn new(registry: Arc<dyn ToolRegistry>, executor: Arc<dyn ToolExecutor>) -> Self {
        Self {
            registry,
            executor,
            spec_cache: RwLock::new(HashMap::new()),
            explicit_specs: HashMap::new(),
        }
    }

    pub fn with_explicit_spec(mut self, spec: ToolSpec) -> Self {
        self.explicit_specs.insert(spec.name.clone(), spec);
        self
    }

    fn resolve_spec(&self, tool_name: &str) -> Option<Arc<ToolSpec>> {
        if let Some(spec) = self.explicit_specs.get(tool_name) {
            return Some(Arc::new(spec.clone()));
        }
        if let Some(cached) = self.spec_cache.read().get(tool_name) {
            return Some(cached.clone());
        }
        let registration = self.registry.get(tool_name)?;
        let spec = Arc::new(ToolSpec::new(
            registration.name.clone(),
            synthesize_input_schema(&registration),
        ));
        self.spec_cache.write().insert(tool_name.to_string(), spec.clone());
        Some(spec)
    }

    pub async fn execute(&self, call: &ToolCall, trace_id: &str, cancellation: CancelToken) -> ToolResult {
        let started = Instant::now();

        let Some(spec) = self.resolve_spec(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ErrorCode::NotFound, "tool not found", 0, started.elapsed());
        };

        if let Err(e) = ao_validation::validate(&call.arguments, &spec.input_schema) {
            return ToolResult::failure(&call.tool_name, ErrorCode::InvalidInput, e.to_string(), 0, started.elapsed());
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let attempt_started = Instant::now();

            if cancellation.is_cancelled() {
                return ToolResult::failure(
                    &call.tool_name,
                    ErrorCode::Timeout,
                    "cancelled before attempt",
                    attempt,
                    started.elapsed(),
                );
            }

            let context = ExecutionContext {
                cancellation: cancellation.clone(),
                working_directory: None,
            };

            let outcome = run_one_attempt(
                self.executor.as_ref(),
                &call.tool_name,
                call.arguments.clone(),
                context,
                spec.timeout,
                cancellation.clone(),
            )
            .await;

            match outcome {
                AttemptOutcome::Success(result) => {
                    return finalize_success(&call.tool_name, result, &spec, attempt, started.elapsed());
                }
                AttemptOutcome::Timeout => {
                    if attempt > spec.retry_policy.max_retries {
                        return ToolResult::failure(
                            &call.tool_name,
                            ErrorCode::Timeout,
                            format!("timed out after {:?}", attempt_started.elapsed()),
                            attempt,
                            started.elapsed(),
                        );
                    }
                }
                AttemptOutcome::Error(code, message) => {
                    if !code.is_retryable() || attempt > spec.retry_policy.max_retries {
                        return ToolResult::failure(&call.tool_name, code, message, attempt, started.elapsed());
                    }
                }
            }

            let delay = delay_for_attempt(
                spec.retry_policy.strategy,
                spec.retry_policy.base_backoff,
                attempt,
                spec.retry_policy.jitter_factor,
            );
            TraceEvent::ToolRetried {
                trace_id: trace_id.to_string(),
                tool_name: call.tool_name.clone(),
                attempt,
                delay_ms: delay.as_millis() as u64,
            }
            .emit();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}

enum AttemptOutcome {
    Success(ExecutionResult),
    Timeout,
    Error(ErrorCode, String),
}

async fn run_one_attempt(
    executor: &dyn ToolExecutor,
    tool_name: &str,
    params: serde_json::Value,
    context: ExecutionContext,
    timeout: Duration,
    cancellation: CancelToken,
) -> AttemptOutcome {
    let invocation = executor.execute(tool_name, params, context);
    tokio::select! {
        result = tokio::time::timeout(timeout, invocation) => {
            match result {
                Ok(execution_result) => classify_execution_result(execution_result),
                Err(_) => AttemptOutcome::Timeout,
            }
        }
        _ = wait_cancelled(cancellation) => AttemptOutcome::Timeout,
    }
}

async fn wait_cancelled(token: CancelToken) {
    while !token.is_cancelled() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn classify_execution_result(result: ExecutionResult) -> AttemptOutcome {
    if result.is_successful {
        return AttemptOutcome::Success(result);
    }
    let message = result
        .error_message
        .or(result.error)
        .or(result.message)
        .unwrap_or_else(|| "tool execution failed".to_string());

    if classify::is_rate_limited_message(&message) {
        AttemptOutcome::Error(ErrorCode::RateLimited, message)
    } else if classify::is_retryable_message(&message) {
        AttemptOutcome::Error(ErrorCode::RetryableServer, message)
    } else {
        AttemptOutcome::Error(ErrorCode::ToolBug, message)
    }
}

fn finalize_success(
    tool_name: &str,
    result: ExecutionResult,
    spec: &ToolSpec,
    attempt: u32,
    latency: Duration,
) -> ToolResult {
    let data = result.data.unwrap_or(serde_json::Value::Null);
    let (ok, error, normalized) = ao_validation::validate_and_normalize(&data, &spec.output_schema);

    if !ok {
        let mut r = ToolResult::failure(
            tool_name,
            ErrorCode::OutputSchemaMismatch,
            error.unwrap_or_default(),
            attempt,
            latency,
        );
        r.data = Some(data);
        return r;
    }

    ToolResult::success(tool_name, normalized, attempt, latency)
}
