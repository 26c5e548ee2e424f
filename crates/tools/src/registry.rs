//! A static `ToolRegistry` listing the bundled exec/process/file tools.

use ao_domain::collaborators::{ToolParameter, ToolRegistration, ToolRegistry};

fn string_param(name: &str, description: &str, required: bool) -> ToolParameter {
    ToolParameter {
        name: name.to_string(),
        type_keyword: "string".to_string(),
        description: description.to_string(),
        required,
        default: None,
        allowed_values: vec![],
    }
}

/// Registry exposing the tools this crate implements.
pub struct StaticToolRegistry {
    registrations: Vec<ToolRegistration>,
}

impl Default for StaticToolRegistry {
    fn default() -> Self {
        Self {
            registrations: vec![
                ToolRegistration {
                    id: "exec".into(),
                    name: "exec".into(),
                    description: "Run a shell command, foreground or backgrounded.".into(),
                    parameters: vec![
                        string_param("command", "shell command to run", true),
                        string_param("workdir", "working directory", false),
                    ],
                },
                ToolRegistration {
                    id: "process".into(),
                    name: "process".into(),
                    description: "Manage background process sessions (list/poll/log/write/kill/clear/remove).".into(),
                    parameters: vec![
                        string_param("action", "one of list/poll/log/write/kill/clear/remove", true),
                        string_param("session_id", "target session id", false),
                    ],
                },
                ToolRegistration {
                    id: "read_file".into(),
                    name: "read_file".into(),
                    description: "Read a file within the workspace root.".into(),
                    parameters: vec![string_param("path", "path relative to the workspace root", true)],
                },
                ToolRegistration {
                    id: "write_file".into(),
                    name: "write_file".into(),
                    description: "Write (create or overwrite) a file within the workspace root.".into(),
                    parameters: vec![
                        string_param("path", "path relative to the workspace root", true),
                        string_param("content", "file content", true),
                    ],
                },
                ToolRegistration {
                    id: "list_directory".into(),
                    name: "list_directory".into(),
                    description: "List entries of a directory within the workspace root.".into(),
                    parameters: vec![string_param("path", "path relative to the workspace root", false)],
                },
            ],
        }
    }
}

impl ToolRegistry for StaticToolRegistry {
    fn get(&self, tool_name: &str) -> Option<ToolRegistration> {
        self.registrations.iter().find(|r| r.name == tool_name).cloned()
    }

    fn tools(&self) -> Vec<ToolRegistration> {
        self.registrations.clone()
    }
}
