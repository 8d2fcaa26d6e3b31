//! Process supervision errors with structured context.
//!
//! These errors carry the failed operation and a machine-readable context
//! blob so hosts can decide what to surface to the user.

use serde_json::{Value, json};
use thiserror::Error;

/// Errors from launching, signaling, and writing to the managed process.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The OS could not create the process (program missing, not
    /// executable). Carries the program name the caller asked for.
    #[error("Failed to launch \"{program}\": {reason}")]
    Launch { program: String, reason: String },
    /// Sending a termination signal to the process tree failed.
    #[error("Failed to signal process {pid}: {reason}")]
    Signal { pid: u32, reason: String },
    /// Writing to the process's input stream failed.
    #[error("Failed to write to process input: {0}")]
    Write(String),
    /// The process's input stream is gone (never opened or already closed).
    #[error("Process input stream is closed")]
    InputClosed,
    /// A command line must name at least the program to run.
    #[error("Empty command line")]
    EmptyCommand,
}

impl ProcessError {
    /// Returns structured context about the error for debugging.
    pub fn context(&self) -> Value {
        match self {
            ProcessError::Launch { program, reason } => json!({
                "operation": "launch",
                "program": program,
                "reason": reason
            }),
            ProcessError::Signal { pid, reason } => json!({
                "operation": "signal",
                "pid": pid,
                "reason": reason
            }),
            ProcessError::Write(reason) => json!({
                "operation": "write",
                "reason": reason
            }),
            ProcessError::InputClosed => json!({
                "operation": "write",
                "reason": "input stream closed"
            }),
            ProcessError::EmptyCommand => json!({
                "operation": "build-command",
                "reason": "empty command line"
            }),
        }
    }

    /// Returns a helpful suggestion for resolving the error.
    pub fn suggestion(&self) -> String {
        match self {
            ProcessError::Launch { program, .. } => format!(
                "\"{}\" was not found. Check that it is installed and on PATH, or configure its full path.",
                program
            ),
            ProcessError::Signal { .. } => {
                "The process may already have exited. Check is_running() before signaling.".to_string()
            }
            ProcessError::Write(_) | ProcessError::InputClosed => {
                "The process has likely exited. Check is_running() before sending input.".to_string()
            }
            ProcessError::EmptyCommand => {
                "Supply at least the program name in the command line.".to_string()
            }
        }
    }

    /// Returns the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            ProcessError::Launch { .. } => "launch",
            ProcessError::Signal { .. } => "signal",
            ProcessError::Write(_) | ProcessError::InputClosed => "write",
            ProcessError::EmptyCommand => "build-command",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_error_names_program() {
        let err = ProcessError::Launch {
            program: "sbt".into(),
            reason: "No such file or directory".into(),
        };
        assert!(err.to_string().contains("\"sbt\""));
        assert_eq!(err.context()["program"], "sbt");
        assert!(err.suggestion().contains("full path"));
    }

    #[test]
    fn test_signal_error_context() {
        let err = ProcessError::Signal {
            pid: 1234,
            reason: "No such process".into(),
        };
        assert_eq!(err.context()["operation"], "signal");
        assert_eq!(err.context()["pid"], 1234);
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(
            ProcessError::Write("broken pipe".into()).operation(),
            "write"
        );
        assert_eq!(ProcessError::InputClosed.operation(), "write");
        assert_eq!(ProcessError::EmptyCommand.operation(), "build-command");
    }
}
