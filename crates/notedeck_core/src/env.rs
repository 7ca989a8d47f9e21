//! Scoped environment overrides for tests that read `NOTEDECK_*` variables.
//!
//! Compiled only for tests and the `test-support` feature.

use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard, PoisonError};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Holds the process-wide env lock and undoes every override on drop.
///
/// ```ignore
/// let mut env = ScopedEnv::lock();
/// env.set("NOTEDECK_API_URL", "http://localhost:9000")
///     .unset("NOTEDECK_TIMEOUT_SECS");
/// ```
pub struct ScopedEnv {
    saved: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Block until no other `ScopedEnv` is alive.
    ///
    /// A test that panicked while holding the lock already restored its
    /// overrides on unwind, so poisoning is ignored.
    pub fn lock() -> Self {
        let guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        Self {
            saved: Vec::new(),
            _guard: guard,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        self.remember(key);
        write_var(key, Some(OsStr::new(value)));
        self
    }

    pub fn unset(&mut self, key: &str) -> &mut Self {
        self.remember(key);
        write_var(key, None);
        self
    }

    /// Only the value seen before the first override is restored.
    fn remember(&mut self, key: &str) {
        if self.saved.iter().all(|(saved, _)| saved != key) {
            self.saved.push((key.to_string(), std::env::var_os(key)));
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            write_var(&key, value.as_deref());
        }
    }
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&OsStr>) {
    // SAFETY: writers go through `ScopedEnv`, which holds `ENV_LOCK`.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{write_var, ScopedEnv};
    use std::ffi::OsStr;

    #[test]
    fn overrides_are_undone_on_drop() {
        let key = "NOTEDECK_TEST_SCOPED_ENV_RESTORE";
        let mut env = ScopedEnv::lock();
        env.set(key, "first").set(key, "second");
        assert_eq!(std::env::var(key).ok().as_deref(), Some("second"));
        drop(env);
        assert!(std::env::var(key).is_err());
    }

    #[test]
    fn unset_restores_value_present_before_lock() {
        let key = "NOTEDECK_TEST_SCOPED_ENV_UNSET";
        {
            let _env = ScopedEnv::lock();
            write_var(key, Some(OsStr::new("kept")));
        }

        let mut env = ScopedEnv::lock();
        env.unset(key);
        assert!(std::env::var(key).is_err());
        drop(env);
        assert_eq!(std::env::var(key).ok().as_deref(), Some("kept"));

        let _env = ScopedEnv::lock();
        write_var(key, None);
    }
}
