use std::sync::Mutex;
use std::sync::MutexGuard;

use tracing::warn;

/// Lock a mutex, recovering the inner value if a previous holder panicked.
pub fn mutex_lock_or_recover<T>(lock: &Mutex<T>) -> MutexGuard<'_, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!("recovering from poisoned mutex");
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_lock_plain_mutex() {
        let m = Mutex::new(1);
        assert_eq!(*mutex_lock_or_recover(&m), 1);
    }

    #[test]
    fn test_recovers_from_poison() {
        let m = Arc::new(Mutex::new(41));
        let m2 = Arc::clone(&m);
        let _ = thread::spawn(move || {
            let _guard = m2.lock().unwrap();
            panic!("poison it");
        })
        .join();

        let mut guard = mutex_lock_or_recover(&m);
        *guard += 1;
        assert_eq!(*guard, 42);
    }
}
