//! Platform-specific spawn and termination.
//!
//! The command line is wrapped by a shell on both platforms, so signaling
//! only the spawned pid would miss the build tool and anything it forked.
//! Each launcher therefore spawns in a way that lets the whole tree be
//! torn down: a fresh process group on POSIX, a tree-kill utility on
//! Windows.

use std::path::Path;
use std::process::Child;
use std::sync::Arc;

use crate::command::CommandSpec;
use crate::error::ProcessError;

#[cfg(unix)]
pub(crate) mod unix;
#[cfg(windows)]
pub(crate) mod windows;

/// Capability to spawn a process and later terminate it as a tree.
pub trait PlatformLauncher: Send + Sync {
    /// Spawn `command` in `cwd` with all three stdio streams piped.
    fn spawn(&self, command: &CommandSpec, cwd: &Path) -> Result<Child, ProcessError>;

    /// Graceful termination of the process and its descendants. A
    /// synchronous signal-send; does not wait for the exit.
    fn terminate(&self, pid: u32) -> Result<(), ProcessError>;

    /// Forced termination of the process and its descendants.
    fn kill(&self, pid: u32) -> Result<(), ProcessError>;
}

/// The launcher for the current platform.
pub fn native_launcher() -> Arc<dyn PlatformLauncher> {
    #[cfg(unix)]
    {
        Arc::new(unix::UnixLauncher::new())
    }
    #[cfg(windows)]
    {
        Arc::new(windows::WindowsLauncher)
    }
}
