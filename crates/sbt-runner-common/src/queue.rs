//! Main-thread task hand-off.
//!
//! Background threads must be able to deliver a callback to code that only
//! runs on the host's designated thread, without blocking. `MainQueue` is
//! the submission side; `TaskPump` is the drain side, owned by the thread
//! that services the queue (in an editor host, its event loop).

use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::unbounded;
use tracing::debug;

/// A deferred callback.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Submits tasks to the queue's owning thread. Must never block.
pub trait MainQueue: Send + Sync {
    fn dispatch(&self, task: Task);
}

/// Channel-backed `MainQueue`. Dispatch is fire-and-forget: once the drain
/// side has gone away, tasks are discarded.
pub struct ChannelQueue {
    tx: Sender<Task>,
}

impl MainQueue for ChannelQueue {
    fn dispatch(&self, task: Task) {
        if self.tx.send(task).is_err() {
            debug!("main queue receiver dropped; task discarded");
        }
    }
}

/// Drain side of a `ChannelQueue`.
pub struct TaskPump {
    rx: Receiver<Task>,
}

impl TaskPump {
    /// Run every task currently queued, returning how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.rx.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    /// Wait up to `timeout` for one task and run it.
    pub fn run_one(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }
}

/// Create a connected queue/pump pair.
pub fn channel() -> (ChannelQueue, TaskPump) {
    let (tx, rx) = unbounded();
    (ChannelQueue { tx }, TaskPump { rx })
}
