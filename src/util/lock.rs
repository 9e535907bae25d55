use std::sync::{Mutex, MutexGuard};

use tracing::warn;

/// Lock a mutex, recovering the inner state if a previous holder panicked.
pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    target: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    match lock.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!(
                op,
                target_module = target,
                lock_kind = "mutex.lock",
                result = "poisoned_recovered",
                hint = "working list may miss the panicking writer's change",
                "Recovered from poisoned state lock"
            );
            poisoned.into_inner()
        }
    }
}
