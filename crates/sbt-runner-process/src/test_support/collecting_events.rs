use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use sbt_runner_common::mutex_lock_or_recover;

use crate::events::ProcessEvents;

/// Records every callback for later assertions.
#[derive(Default)]
pub struct CollectingEvents {
    starts: AtomicUsize,
    stops: AtomicUsize,
    stdout: Mutex<String>,
    stderr: Mutex<String>,
}

impl CollectingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_count(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// Everything delivered to `on_stdout` so far, concatenated in receipt
    /// order.
    pub fn stdout(&self) -> String {
        mutex_lock_or_recover(&self.stdout).clone()
    }

    /// Everything delivered to `on_stderr` so far, concatenated in receipt
    /// order.
    pub fn stderr(&self) -> String {
        mutex_lock_or_recover(&self.stderr).clone()
    }
}

impl ProcessEvents for CollectingEvents {
    fn on_start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }

    fn on_stdout(&self, chunk: &str) {
        mutex_lock_or_recover(&self.stdout).push_str(chunk);
    }

    fn on_stderr(&self, chunk: &str) {
        mutex_lock_or_recover(&self.stderr).push_str(chunk);
    }
}
