//! Host collaborator interfaces consumed by the supervisor.
//!
//! The editor integration supplies these: where the project lives, what
//! command line to run, and how to show the user an error. The core never
//! discovers any of this itself.

use std::path::PathBuf;

/// Resolves the project a window is editing.
pub trait WorkspaceResolver: Send + Sync {
    /// The directory to launch in; `None` when no project is open.
    fn working_directory(&self) -> Option<PathBuf>;

    /// The configured base command line (program + arguments).
    fn base_command(&self) -> Vec<String>;
}

/// Surfaces user-facing error notifications. Fire-and-forget; the core
/// never waits for dismissal.
pub trait Notifier: Send + Sync {
    fn error_dialog(&self, message: &str);
}

/// Fixed resolver for hosts with a known root and command line.
pub struct StaticWorkspace {
    root: PathBuf,
    command: Vec<String>,
}

impl StaticWorkspace {
    pub fn new(root: impl Into<PathBuf>, command: Vec<String>) -> Self {
        Self {
            root: root.into(),
            command,
        }
    }
}

impl WorkspaceResolver for StaticWorkspace {
    fn working_directory(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }

    fn base_command(&self) -> Vec<String> {
        self.command.clone()
    }
}
