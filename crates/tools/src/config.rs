use serde::{Deserialize, Serialize};

/// Configuration for the bundled exec/process demo tool pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecConfig {
    /// Default yield time in ms before auto-backgrounding (0 = always foreground).
    #[serde(default = "d_background_ms")]
    pub background_ms: u64,
    /// Hard timeout for foreground commands (seconds).
    #[serde(default = "d_timeout_sec")]
    pub timeout_sec: u64,
    /// TTL for finished process sessions before cleanup (ms).
    #[serde(default = "d_cleanup_ms")]
    pub cleanup_ms: u64,
    /// Max output chars kept per process session.
    #[serde(default = "d_max_output_chars")]
    pub max_output_chars: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            background_ms: d_background_ms(),
            timeout_sec: d_timeout_sec(),
            cleanup_ms: d_cleanup_ms(),
            max_output_chars: d_max_output_chars(),
        }
    }
}

fn d_background_ms() -> u64 {
    10_000
}
fn d_timeout_sec() -> u64 {
    1800
}
fn d_cleanup_ms() -> u64 {
    1_800_000
}
fn d_max_output_chars() -> usize {
    1_000_000
}
