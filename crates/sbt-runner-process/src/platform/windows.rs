use std::env;
use std::os::windows::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::debug;

use crate::command::CommandSpec;
use crate::error::ProcessError;

use super::PlatformLauncher;

const DEFAULT_COMSPEC: &str = "cmd.exe";

/// jline grabs the console when sbt thinks it is interactive, which breaks
/// piped capture; this forces the dumb terminal.
const SBT_OPTS_FLAG: &str = "-Djline.terminal=jline.UnsupportedTerminal";

/// CREATE_NO_WINDOW, so helper processes never flash a console window.
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Spawns through the platform shell. Windows offers no process group
/// reachable from this spawn mode, so teardown goes through `taskkill`'s
/// recursive tree kill and graceful/forced termination are the same.
pub struct WindowsLauncher;

impl WindowsLauncher {
    /// The value for `SBT_OPTS`: the caller's existing options, if any,
    /// with the terminal override appended rather than overwritten.
    fn sbt_opts() -> String {
        match env::var("SBT_OPTS") {
            Ok(existing) => format!("{} {}", existing, SBT_OPTS_FLAG),
            Err(_) => SBT_OPTS_FLAG.to_string(),
        }
    }

    /// One command line from the elements, quoted for the MSVCRT argument
    /// parser: whitespace-containing or empty elements are double-quoted,
    /// embedded quotes are backslash-escaped, and backslashes are doubled
    /// only where they precede a quote.
    fn join_cmdline(command: &CommandSpec) -> String {
        let mut out = String::new();
        for element in command.elements() {
            if !out.is_empty() {
                out.push(' ');
            }
            append_quoted(&mut out, element);
        }
        out
    }
}

fn append_quoted(out: &mut String, arg: &str) {
    let needs_quotes = arg.is_empty() || arg.contains(char::is_whitespace);
    if needs_quotes {
        out.push('"');
    }
    let mut backslashes: usize = 0;
    for ch in arg.chars() {
        match ch {
            '\\' => backslashes += 1,
            '"' => {
                out.push_str(&"\\".repeat(backslashes * 2 + 1));
                out.push('"');
                backslashes = 0;
            }
            other => {
                out.push_str(&"\\".repeat(backslashes));
                backslashes = 0;
                out.push(other);
            }
        }
    }
    // a trailing run of backslashes must not swallow the closing quote
    if needs_quotes {
        out.push_str(&"\\".repeat(backslashes * 2));
        out.push('"');
    } else {
        out.push_str(&"\\".repeat(backslashes));
    }
}

impl PlatformLauncher for WindowsLauncher {
    fn spawn(&self, command: &CommandSpec, cwd: &Path) -> Result<Child, ProcessError> {
        let comspec = env::var("COMSPEC").unwrap_or_else(|_| DEFAULT_COMSPEC.to_string());
        let joined = Self::join_cmdline(command);
        debug!(shell = %comspec, command = %joined, "spawning via platform shell");

        Command::new(comspec)
            .arg("/C")
            .arg(&joined)
            .current_dir(cwd)
            .env("SBT_OPTS", Self::sbt_opts())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ProcessError::Launch {
                program: command.program().to_string(),
                reason: e.to_string(),
            })
    }

    fn terminate(&self, pid: u32) -> Result<(), ProcessError> {
        self.kill(pid)
    }

    fn kill(&self, pid: u32) -> Result<(), ProcessError> {
        let status = Command::new("taskkill")
            .args(["/T", "/F", "/PID", &pid.to_string()])
            .creation_flags(CREATE_NO_WINDOW)
            .status()
            .map_err(|e| ProcessError::Signal {
                pid,
                reason: e.to_string(),
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::Signal {
                pid,
                reason: format!("taskkill exited with {}", status),
            })
        }
    }
}
