use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::command::CommandSpec;
use crate::error::ProcessError;
use crate::platform::PlatformLauncher;
use crate::platform::unix::signal_group;

/// Spawns the program directly, skipping the interactive login shell, so
/// tests can assert exact stream contents free of shell startup noise.
/// Group termination semantics match the real launcher.
pub struct DirectLauncher;

impl PlatformLauncher for DirectLauncher {
    fn spawn(&self, command: &CommandSpec, cwd: &Path) -> Result<Child, ProcessError> {
        let (program, args) = command
            .elements()
            .split_first()
            .ok_or(ProcessError::EmptyCommand)?;
        Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .spawn()
            .map_err(|e| ProcessError::Launch {
                program: program.clone(),
                reason: e.to_string(),
            })
    }

    fn terminate(&self, pid: u32) -> Result<(), ProcessError> {
        signal_group(pid, libc::SIGTERM)
    }

    fn kill(&self, pid: u32) -> Result<(), ProcessError> {
        signal_group(pid, libc::SIGKILL)
    }
}
