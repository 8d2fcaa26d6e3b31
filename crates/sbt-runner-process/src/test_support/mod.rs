//! Test doubles for exercising the supervision core.

mod collecting_events;
#[cfg(unix)]
mod direct_launcher;

pub use collecting_events::CollectingEvents;
#[cfg(unix)]
pub use direct_launcher::DirectLauncher;
