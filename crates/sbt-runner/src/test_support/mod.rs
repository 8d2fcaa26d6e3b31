//! Test doubles for the host-facing ports.

mod mock_notifier;

pub use mock_notifier::MockNotifier;
