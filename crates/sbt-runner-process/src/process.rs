//! The managed build-tool process and its background monitors.

use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ExitStatus};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;

use tracing::{debug, warn};

use sbt_runner_common::{MainQueue, mutex_lock_or_recover};

use crate::command::CommandSpec;
use crate::decode::ChunkDecoder;
use crate::error::ProcessError;
use crate::events::ProcessEvents;
use crate::platform::PlatformLauncher;

/// Upper bound for one blocking read on an output stream. Chunk-oriented,
/// not line-oriented: handlers see whatever arrived, never newline-aligned
/// slices.
pub const READ_CHUNK_SIZE: usize = 32 * 1024;

/// One live OS process, supervised by up to three background threads: a
/// reader per output stream and an exit waiter. The threads end on their
/// own when their stream closes or the process exits; nothing joins them.
///
/// The `Child` itself lives on the waiter thread (the only place that may
/// block in `wait`); the pid, the stdin handle, and the published exit
/// status stay here.
pub struct ManagedProcess {
    launcher: Arc<dyn PlatformLauncher>,
    pid: u32,
    stdin: Mutex<Option<ChildStdin>>,
    exit: Arc<OnceLock<Option<ExitStatus>>>,
}

impl ManagedProcess {
    /// Spawn `command` in `cwd` and begin supervising it.
    ///
    /// `events.on_start` runs on the caller's stack before any background
    /// thread exists, so it is ordered before every output and stop
    /// callback. A stream the child does not expose simply gets no reader.
    pub fn start(
        launcher: Arc<dyn PlatformLauncher>,
        command: &CommandSpec,
        cwd: &Path,
        events: Arc<dyn ProcessEvents>,
        queue: Arc<dyn MainQueue>,
    ) -> Result<Self, ProcessError> {
        let mut child = launcher.spawn(command, cwd)?;
        let pid = child.id();
        debug!(pid, program = command.program(), "process started");

        events.on_start();

        let stdin = child.stdin.take();
        if let Some(stdout) = child.stdout.take() {
            let events = Arc::clone(&events);
            spawn_reader("sbt-stdout", stdout, move |chunk| events.on_stdout(chunk));
        }
        if let Some(stderr) = child.stderr.take() {
            let events = Arc::clone(&events);
            spawn_reader("sbt-stderr", stderr, move |chunk| events.on_stderr(chunk));
        }

        let exit = Arc::new(OnceLock::new());
        spawn_waiter(child, Arc::clone(&exit), events, queue);

        Ok(Self {
            launcher,
            pid,
            stdin: Mutex::new(stdin),
            exit,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// True until the exit waiter has reaped the process.
    pub fn is_running(&self) -> bool {
        self.exit.get().is_none()
    }

    /// The exit status, once the process has been reaped.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.exit.get().copied().flatten()
    }

    /// Write `input` to the process's stdin and flush. There is no running
    /// guard here: sending to an exited process propagates the failure,
    /// and callers wanting silence check `is_running` first.
    pub fn send(&self, input: &str) -> Result<(), ProcessError> {
        let mut stdin = mutex_lock_or_recover(&self.stdin);
        let stdin = stdin.as_mut().ok_or(ProcessError::InputClosed)?;
        stdin
            .write_all(input.as_bytes())
            .map_err(|e| ProcessError::Write(e.to_string()))?;
        stdin.flush().map_err(|e| ProcessError::Write(e.to_string()))
    }

    /// Ask the whole process tree to shut down. Returns once the signal is
    /// sent; the waiter thread observes and reports the actual exit.
    pub fn terminate(&self) -> Result<(), ProcessError> {
        debug!(pid = self.pid, "terminating process tree");
        self.launcher.terminate(self.pid)
    }

    /// Forcibly end the whole process tree. Returns once the signal is
    /// sent.
    pub fn kill(&self) -> Result<(), ProcessError> {
        debug!(pid = self.pid, "killing process tree");
        self.launcher.kill(self.pid)
    }
}

/// Blocking reader loop: read up to `READ_CHUNK_SIZE`, hand non-empty
/// decoded chunks to the handler on this thread, stop on end-of-stream.
/// Read errors end delivery for this stream only.
fn spawn_reader<R, F>(name: &str, mut stream: R, handle: F)
where
    R: Read + Send + 'static,
    F: Fn(&str) + Send + 'static,
{
    let spawned = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let mut buf = vec![0u8; READ_CHUNK_SIZE];
            let mut decoder = ChunkDecoder::new();
            loop {
                match stream.read(&mut buf) {
                    Ok(0) => {
                        let tail = decoder.finish();
                        if !tail.is_empty() {
                            handle(&tail);
                        }
                        break;
                    }
                    Ok(n) => {
                        let chunk = decoder.decode(&buf[..n]);
                        if !chunk.is_empty() {
                            handle(&chunk);
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "stream read failed, ending delivery");
                        break;
                    }
                }
            }
            // the stream drops here, closing its descriptor
        });
    if let Err(err) = spawned {
        warn!(error = %err, name, "failed to spawn reader thread");
    }
}

/// Blocks until the process exits, reaps and publishes its status, then
/// schedules `on_stop` onto the main queue (fire-and-forget).
fn spawn_waiter(
    mut child: Child,
    exit: Arc<OnceLock<Option<ExitStatus>>>,
    events: Arc<dyn ProcessEvents>,
    queue: Arc<dyn MainQueue>,
) {
    let spawned = thread::Builder::new()
        .name("sbt-wait".to_string())
        .spawn(move || {
            let status = match child.wait() {
                Ok(status) => {
                    debug!(code = status.code(), "process exited");
                    Some(status)
                }
                Err(err) => {
                    warn!(error = %err, "wait on process failed");
                    None
                }
            };
            let _ = exit.set(status);
            queue.dispatch(Box::new(move || events.on_stop()));
        });
    if let Err(err) = spawned {
        warn!(error = %err, "failed to spawn exit waiter thread");
    }
}
