//! Bundled demo tools for the orchestration engine.
//!
//! Implements the exec/process tool pair following OpenClaw semantics:
//! - `exec`: run commands foreground or auto-background after yieldMs
//! - `process`: manage background sessions (list/poll/log/write/kill/clear/remove)
//!
//! plus a small set of workspace-root-constrained file operations, all
//! wrapped behind `ToolRegistry`/`ToolExecutor` for consumption by the
//! orchestrator.

pub mod config;
pub mod exec;
pub mod executor;
pub mod file_ops;
pub mod manager;
pub mod process;
pub mod registry;

pub use executor::LocalToolExecutor;
pub use manager::ProcessManager;
pub use registry::StaticToolRegistry;
