use serde::{Deserialize, Serialize};

use crate::ordered_map::OrderedMap;
use crate::tool_spec::ToolResult;

/// Structured, bounded digest of a `ToolResult`. Produced purely by the
/// Observation Normalizer; never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub summary: String,
    /// Ordered by extraction order, per I5.
    pub key_facts: OrderedMap,
    pub affordances: Vec<String>,
    pub raw: ToolResult,
}
