#![deny(clippy::all)]

pub mod telemetry;
pub mod test_support;

mod ports;
mod runner;

pub use ports::Notifier;
pub use ports::StaticWorkspace;
pub use ports::WorkspaceResolver;
pub use runner::SbtRunner;

// Hosts embed the supervisor through this crate alone.
pub use sbt_runner_common::ChannelQueue;
pub use sbt_runner_common::MainQueue;
pub use sbt_runner_common::Task;
pub use sbt_runner_common::TaskPump;
pub use sbt_runner_common::channel;
pub use sbt_runner_process::CommandSpec;
pub use sbt_runner_process::ManagedProcess;
pub use sbt_runner_process::ProcessError;
pub use sbt_runner_process::ProcessEvents;
