#![deny(clippy::all)]

pub mod error;
pub mod test_support;

mod command;
mod decode;
mod events;
mod platform;
mod process;

pub use command::CommandSpec;
pub use command::quote;
pub use error::ProcessError;
pub use events::ProcessEvents;
pub use platform::PlatformLauncher;
pub use platform::native_launcher;
#[cfg(unix)]
pub use platform::unix::UnixLauncher;
#[cfg(windows)]
pub use platform::windows::WindowsLauncher;
pub use process::ManagedProcess;
pub use process::READ_CHUNK_SIZE;

pub type Result<T> = std::result::Result<T, ProcessError>;
