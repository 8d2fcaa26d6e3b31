#![deny(clippy::all)]

mod queue;
mod sync;

pub use queue::ChannelQueue;
pub use queue::MainQueue;
pub use queue::Task;
pub use queue::TaskPump;
pub use queue::channel;
pub use sync::mutex_lock_or_recover;
