use std::sync::Mutex;

use sbt_runner_common::mutex_lock_or_recover;

use crate::ports::Notifier;

/// Records dialog messages instead of showing them.
#[derive(Default)]
pub struct MockNotifier {
    messages: Mutex<Vec<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        mutex_lock_or_recover(&self.messages).clone()
    }
}

impl Notifier for MockNotifier {
    fn error_dialog(&self, message: &str) {
        mutex_lock_or_recover(&self.messages).push(message.to_string());
    }
}
