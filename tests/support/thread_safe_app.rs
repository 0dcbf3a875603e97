//! Mutex-guarded Bevy `App` shared between rspec closures.

use bevy::prelude::App;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// `App` wrapper that can sit inside an rspec fixture.
#[derive(Debug)]
pub struct ThreadSafeApp(pub App);

impl Deref for ThreadSafeApp {
    type Target = App;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ThreadSafeApp {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// SAFETY: rspec fixtures must be `Send + Sync`. The focus suites run with
// `parallel(false)` and every access goes through the mutex in `SharedApp`,
// so the app is never touched from two threads at once.
unsafe impl Send for ThreadSafeApp {}
unsafe impl Sync for ThreadSafeApp {}

/// Shared handle cloned into every scenario.
pub type SharedApp = Arc<Mutex<ThreadSafeApp>>;

/// Wraps `app` for sharing.
pub fn share(app: App) -> SharedApp {
    Arc::new(Mutex::new(ThreadSafeApp(app)))
}

/// Locks the shared app. A panic in an earlier scenario poisons the mutex;
/// the guard is recovered so later scenarios still report their own result.
pub fn lock_app(app: &SharedApp) -> MutexGuard<'_, ThreadSafeApp> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}
