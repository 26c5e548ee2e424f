//! Adapts the bundled exec/process/file tools to the `ToolExecutor`
//! collaborator contract.

use std::path::PathBuf;
use std::sync::Arc;

use ao_domain::collaborators::{ExecutionContext, ExecutionResult, ToolExecutor};
use async_trait::async_trait;

use crate::config::ExecConfig;
use crate::exec::{self, ExecRequest};
use crate::file_ops;
use crate::manager::ProcessManager;
use crate::process::{self, ProcessRequest};

/// Dispatches tool calls to the exec/process manager and the workspace-root
/// file operations.
pub struct LocalToolExecutor {
    manager: Arc<ProcessManager>,
    workspace_root: PathBuf,
}

impl LocalToolExecutor {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            manager: Arc::new(ProcessManager::new(ExecConfig::default())),
            workspace_root: workspace_root.into(),
        }
    }

    fn deserialize<T: serde::de::DeserializeOwned>(params: serde_json::Value) -> Result<T, ExecutionResult> {
        serde_json::from_value(params).map_err(|e| ExecutionResult {
            is_successful: false,
            data: None,
            error: None,
            error_message: Some(format!("invalid arguments: {e}")),
            message: None,
        })
    }
}

#[async_trait]
impl ToolExecutor for LocalToolExecutor {
    async fn execute(&self, tool_name: &str, params: serde_json::Value, _context: ExecutionContext) -> ExecutionResult {
        match tool_name {
            "exec" => {
                let req: ExecRequest = match Self::deserialize(params) {
                    Ok(r) => r,
                    Err(e) => return e,
                };
                let response = exec::exec(&self.manager, req).await;
                ExecutionResult {
                    is_successful: !matches!(response.status, crate::manager::ProcessStatus::Failed),
                    data: Some(serde_json::to_value(&response).unwrap_or_default()),
                    error: None,
                    error_message: None,
                    message: None,
                }
            }
            "process" => {
                let req: ProcessRequest = match Self::deserialize(params) {
                    Ok(r) => r,
                    Err(e) => return e,
                };
                let response = process::handle_process(&self.manager, req).await;
                ExecutionResult {
                    is_successful: response.success,
                    data: response.data.clone(),
                    error: response.error.clone(),
                    error_message: response.error,
                    message: None,
                }
            }
            "read_file" => self.run_file_op(params, |root, req| Box::pin(file_ops::file_read(root, req))).await,
            "write_file" => self.run_file_op(params, |root, req| Box::pin(file_ops::file_write(root, req))).await,
            "list_directory" => {
                self.run_file_op(params, |root, req| Box::pin(file_ops::file_list(root, req))).await
            }
            _ => ExecutionResult {
                is_successful: false,
                data: None,
                error: Some("unknown tool".to_string()),
                error_message: Some(format!("'{tool_name}' is not implemented by this executor")),
                message: None,
            },
        }
    }
}

impl LocalToolExecutor {
    async fn run_file_op<Req, F>(&self, params: serde_json::Value, op: F) -> ExecutionResult
    where
        Req: serde::de::DeserializeOwned,
        F: FnOnce(&std::path::Path, Req) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<serde_json::Value, String>> + '_>>,
    {
        let req: Req = match Self::deserialize(params) {
            Ok(r) => r,
            Err(e) => return e,
        };
        match op(&self.workspace_root, req).await {
            Ok(data) => ExecutionResult {
                is_successful: true,
                data: Some(data),
                error: None,
                error_message: None,
                message: None,
            },
            Err(message) => ExecutionResult {
                is_successful: false,
                data: None,
                error: Some(message.clone()),
                error_message: Some(message),
                message: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_tool_is_not_successful() {
        let executor = LocalToolExecutor::new(".");
        let context = ExecutionContext {
            cancellation: ao_domain::cancel::CancelToken::new(),
            working_directory: None,
        };
        let result = executor.execute("nonexistent_tool", serde_json::json!({}), context).await;
        assert!(!result.is_successful);
    }

    #[tokio::test]
    async fn read_file_round_trips_through_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let executor = LocalToolExecutor::new(dir.path());
        let context = ExecutionContext {
            cancellation: ao_domain::cancel::CancelToken::new(),
            working_directory: None,
        };

        let write = executor
            .execute("write_file", serde_json::json!({"path": "note.txt", "content": "hello"}), context.clone())
            .await;
        assert!(write.is_successful);

        let read = executor.execute("read_file", serde_json::json!({"path": "note.txt"}), context).await;
        assert!(read.is_successful);
        assert_eq!(read.data.unwrap()["content"], "hello");
    }
}
