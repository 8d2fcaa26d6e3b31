/// Callbacks observed over a managed process's lifetime, supplied at start
/// time and held until the process is gone.
///
/// `on_start` runs synchronously inside `ManagedProcess::start`, before any
/// background activity begins. `on_stdout` and `on_stderr` run on their
/// stream's reader thread with non-empty decoded chunks, in per-stream byte
/// order; the two streams interleave arbitrarily with each other, and
/// chunks are read-sized, never line-aligned. `on_stop` runs on the host's
/// main queue after the process has been reaped; it is not ordered after
/// the final output chunks.
pub trait ProcessEvents: Send + Sync {
    fn on_start(&self) {}
    fn on_stop(&self) {}
    fn on_stdout(&self, _chunk: &str) {}
    fn on_stderr(&self, _chunk: &str) {}
}
