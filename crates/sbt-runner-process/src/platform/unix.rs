use std::env;
use std::io;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::command::CommandSpec;
use crate::error::ProcessError;

use super::PlatformLauncher;

const DEFAULT_SHELL: &str = "/bin/bash";

/// Spawns through an interactive login shell in a fresh process group, so
/// the shell and everything it forks can be signaled together.
#[derive(Default)]
pub struct UnixLauncher {
    shell_override: Option<PathBuf>,
}

impl UnixLauncher {
    /// Resolves the shell from `$SHELL` at spawn time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always spawn through `shell`, for hosts that let the user configure
    /// one.
    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell_override: Some(shell.into()),
        }
    }

    fn shell(&self) -> String {
        match &self.shell_override {
            Some(shell) => shell.to_string_lossy().into_owned(),
            None => env::var("SHELL").unwrap_or_else(|_| DEFAULT_SHELL.to_string()),
        }
    }

    /// csh and friends reject `-l` combined with `-c`; every other shell
    /// gets an interactive login invocation so user rc/profile settings
    /// (PATH above all) apply.
    fn shell_flag(shell: &str) -> &'static str {
        if shell.ends_with("csh") {
            "-ic"
        } else {
            "-lic"
        }
    }
}

impl PlatformLauncher for UnixLauncher {
    fn spawn(&self, command: &CommandSpec, cwd: &Path) -> Result<Child, ProcessError> {
        let shell = self.shell();
        let flag = Self::shell_flag(&shell);
        let joined = command.to_shell_string();
        debug!(shell = %shell, flag, command = %joined, "spawning via shell");

        Command::new(&shell)
            .arg(flag)
            .arg(&joined)
            .current_dir(cwd)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .spawn()
            .map_err(|e| ProcessError::Launch {
                program: command.program().to_string(),
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

/// Signal the whole process group led by `pid`.
pub(crate) fn signal_group(pid: u32, signal: libc::c_int) -> Result<(), ProcessError> {
    let ret = unsafe { libc::killpg(pid as libc::pid_t, signal) };
    if ret == 0 {
        Ok(())
    } else {
        Err(ProcessError::Signal {
            pid,
            reason: io::Error::last_os_error().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csh_variants_skip_login_flag() {
        assert_eq!(UnixLauncher::shell_flag("/bin/csh"), "-ic");
        assert_eq!(UnixLauncher::shell_flag("/usr/local/bin/tcsh"), "-ic");
    }

    #[test]
    fn test_other_shells_get_login_interactive_command() {
        assert_eq!(UnixLauncher::shell_flag("/bin/bash"), "-lic");
        assert_eq!(UnixLauncher::shell_flag("/bin/zsh"), "-lic");
        assert_eq!(UnixLauncher::shell_flag("/bin/sh"), "-lic");
    }

    #[test]
    fn test_shell_override_wins_over_environment() {
        assert_eq!(UnixLauncher::with_shell("/bin/sh").shell(), "/bin/sh");
    }

    #[test]
    fn test_signal_group_reports_missing_group() {
        // a pid far beyond any default pid_max
        let err = signal_group(999_999_999, libc::SIGTERM).unwrap_err();
        assert!(matches!(err, ProcessError::Signal { .. }));
    }
}
