//! Per-window supervision of a single build-tool process.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;

use tracing::{debug, warn};

use sbt_runner_common::MainQueue;
use sbt_runner_process::{
    CommandSpec, ManagedProcess, PlatformLauncher, ProcessError, ProcessEvents, native_launcher,
};

use crate::ports::{Notifier, WorkspaceResolver};

/// Supervises at most one running sbt process for one editor window.
///
/// Callers drive a runner from a single thread; the at-most-one-process
/// invariant is guard-checked, not lock-enforced. A runner goes back to
/// idle by itself once its process exits, so `start` after an exit simply
/// launches a fresh process.
pub struct SbtRunner {
    workspace: Arc<dyn WorkspaceResolver>,
    notifier: Arc<dyn Notifier>,
    queue: Arc<dyn MainQueue>,
    launcher: Arc<dyn PlatformLauncher>,
    proc: Option<ManagedProcess>,
}

impl SbtRunner {
    pub fn new(
        workspace: Arc<dyn WorkspaceResolver>,
        notifier: Arc<dyn Notifier>,
        queue: Arc<dyn MainQueue>,
    ) -> Self {
        Self::with_launcher(workspace, notifier, queue, native_launcher())
    }

    /// Like `new`, with an explicit launcher for hosts and tests that need
    /// to control spawning.
    pub fn with_launcher(
        workspace: Arc<dyn WorkspaceResolver>,
        notifier: Arc<dyn Notifier>,
        queue: Arc<dyn MainQueue>,
        launcher: Arc<dyn PlatformLauncher>,
    ) -> Self {
        Self {
            workspace,
            notifier,
            queue,
            launcher,
            proc: None,
        }
    }

    /// The directory a start would launch in, if one resolves.
    pub fn working_directory(&self) -> Option<PathBuf> {
        self.workspace.working_directory()
    }

    /// The command line a start would run: the configured base command
    /// plus an optional single trailing argument.
    pub fn command_line(&self, extra: Option<&str>) -> Option<CommandSpec> {
        let mut elements = self.workspace.base_command();
        if let Some(extra) = extra {
            elements.push(extra.to_string());
        }
        CommandSpec::new(elements).ok()
    }

    /// Launch the build tool. A silent no-op while a process is already
    /// running or when no working directory resolves. A spawn failure is
    /// surfaced once through the notifier and the runner stays idle.
    pub fn start(&mut self, extra: Option<&str>, events: Arc<dyn ProcessEvents>) {
        if self.is_running() {
            debug!("start ignored, process already running");
            return;
        }
        let Some(cwd) = self.workspace.working_directory() else {
            warn!("start ignored, no working directory resolved");
            return;
        };
        let Some(command) = self.command_line(extra) else {
            warn!("start ignored, empty base command");
            return;
        };

        match ManagedProcess::start(
            Arc::clone(&self.launcher),
            &command,
            &cwd,
            events,
            Arc::clone(&self.queue),
        ) {
            Ok(proc) => self.proc = Some(proc),
            Err(err @ ProcessError::Launch { .. }) => {
                debug!(error = %err, "launch failed");
                self.notifier
                    .error_dialog(&launch_failure_message(command.program()));
            }
            Err(err) => {
                warn!(error = %err, "failed to start process");
            }
        }
    }

    /// Graceful group termination. No-op unless running.
    pub fn stop(&mut self) {
        if let Some(proc) = self.running_proc() {
            if let Err(err) = proc.terminate() {
                warn!(error = %err, "terminate failed");
            }
        }
    }

    /// Forced group kill. No-op unless running.
    pub fn kill(&mut self) {
        if let Some(proc) = self.running_proc() {
            if let Err(err) = proc.kill() {
                warn!(error = %err, "kill failed");
            }
        }
    }

    /// Send input to the running process. No-op unless running; a write
    /// failure on a live process propagates.
    pub fn send(&mut self, input: &str) -> Result<(), ProcessError> {
        match self.running_proc() {
            Some(proc) => proc.send(input),
            None => Ok(()),
        }
    }

    /// False when nothing was ever started or the last process exited.
    pub fn is_running(&self) -> bool {
        self.proc.as_ref().is_some_and(ManagedProcess::is_running)
    }

    /// Exit status of the most recent process, once reaped. Lets hosts
    /// distinguish a failed build from a killed one after `on_stop`.
    pub fn last_exit_status(&self) -> Option<ExitStatus> {
        self.proc.as_ref().and_then(ManagedProcess::exit_status)
    }

    fn running_proc(&self) -> Option<&ManagedProcess> {
        self.proc.as_ref().filter(|p| p.is_running())
    }
}

fn launch_failure_message(program: &str) -> String {
    format!(
        "Unable to find \"{}\".\n\nYou may need to specify the full path to your sbt command.",
        program
    )
}
