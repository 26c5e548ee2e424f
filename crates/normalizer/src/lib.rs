//! The Observation Normalizer (§4.5): a pure function reducing any
//! `ToolResult` to a bounded, structured `Observation`.

mod truncate;

use ao_domain::observation::Observation;
use ao_domain::ordered_map::OrderedMap;
use ao_domain::tool_spec::{ErrorCode, ToolResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use truncate::truncate_with_ellipsis;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormalizerConfig {
    #[serde(default = "d_max_depth")]
    pub max_depth: usize,
    #[serde(default = "d_max_key_facts")]
    pub max_key_facts: usize,
    #[serde(default = "d_max_value_length")]
    pub max_value_length: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            max_depth: d_max_depth(),
            max_key_facts: d_max_key_facts(),
            max_value_length: d_max_value_length(),
        }
    }
}

fn d_max_depth() -> usize {
    3
}
fn d_max_key_facts() -> usize {
    20
}
fn d_max_value_length() -> usize {
    200
}

pub fn normalize(result: &ToolResult, config: &NormalizerConfig) -> Observation {
    let summary = build_summary(result);
    let mut key_facts = OrderedMap::new();

    key_facts.insert("execution_time_ms", format!("{:.2}", result.latency.as_secs_f64() * 1000.0));
    key_facts.insert("attempt", result.attempt.to_string());

    if result.ok {
        if let Some(data) = &result.data {
            walk_success_data(data, &mut key_facts, config);
        }
    } else {
        key_facts.insert("error_code", format!("{:?}", result.error_code));
        if let Some(details) = &result.error_details {
            key_facts.insert("error_details", truncate_with_ellipsis(details, config.max_value_length));
        }
    }

    cap_key_facts(&mut key_facts, config.max_key_facts);

    let affordances = build_affordances(result);

    Observation {
        summary,
        key_facts,
        affordances,
        raw: result.clone(),
    }
}

fn build_summary(result: &ToolResult) -> String {
    if !result.ok {
        return format!(
            "Tool '{}' failed: {:?} - {}",
            result.tool_name,
            result.error_code,
            result.error_details.as_deref().unwrap_or("")
        );
    }
    match &result.data {
        Some(data) if !data.is_null() => format!("Tool '{}' executed successfully", result.tool_name),
        _ => format!("Tool '{}' completed with no data", result.tool_name),
    }
}

fn walk_success_data(data: &Value, facts: &mut OrderedMap, config: &NormalizerConfig) {
    match data {
        Value::Object(obj) => walk_object("", obj, 0, facts, config),
        Value::Array(arr) => {
            facts.insert("result_count", arr.len().to_string());
            if let Some(first) = arr.first() {
                match first {
                    Value::Object(obj) => walk_object("first_", obj, 0, facts, config),
                    other => {
                        facts.insert("first_result", scalar_to_string(other, config));
                    }
                }
            }
        }
        Value::Null => {}
        scalar => {
            facts.insert("result", scalar_to_string(scalar, config));
        }
    }
}

fn walk_object(prefix: &str, obj: &serde_json::Map<String, Value>, depth: usize, facts: &mut OrderedMap, config: &NormalizerConfig) {
    for (key, value) in obj {
        let dotted = format!("{prefix}{key}");
        match value {
            Value::Object(nested) if depth + 1 < config.max_depth => {
                walk_object(&format!("{dotted}."), nested, depth + 1, facts, config);
            }
            Value::Array(arr) => {
                facts.insert(format!("{dotted}_count"), arr.len().to_string());
            }
            other => {
                facts.insert(dotted, scalar_to_string(other, config));
            }
        }
    }
}

fn scalar_to_string(value: &Value, config: &NormalizerConfig) -> String {
    let s = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    truncate_with_ellipsis(&s, config.max_value_length)
}

fn cap_key_facts(facts: &mut OrderedMap, max: usize) {
    if facts.len() <= max {
        return;
    }
    let capped: Vec<(String, String)> = facts
        .iter()
        .take(max)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    facts.retain_ordered(capped);
}

fn build_affordances(result: &ToolResult) -> Vec<String> {
    let mut affordances = Vec::new();

    if !result.ok {
        match result.error_code {
            ErrorCode::Timeout | ErrorCode::RetryableServer | ErrorCode::RateLimited => {
                affordances.push("retry_with_backoff".to_string());
            }
            ErrorCode::InvalidInput => {
                affordances.push("fix_parameters".to_string());
                affordances.push("ask_user_for_clarification".to_string());
            }
            ErrorCode::Unauthorized | ErrorCode::Forbidden => {
                affordances.push("check_permissions".to_string());
                affordances.push("use_fallback_tool".to_string());
            }
            _ => {}
        }
    } else if let Some(Value::Object(obj)) = &result.data {
        if obj.contains_key("next_page") || obj.contains_key("nextToken") {
            affordances.push("fetch_next_page".to_string());
        }
        if obj.get("has_more") == Some(&Value::Bool(true)) {
            affordances.push("fetch_more_results".to_string());
        }
        if let Some(Value::Array(results)) = obj.get("results") {
            if !results.is_empty() {
                affordances.push("process_results".to_string());
                affordances.push("filter_results".to_string());
            }
        }
    }

    affordances.push("use_different_tool".to_string());
    affordances.push("ask_user_for_guidance".to_string());
    affordances
}
