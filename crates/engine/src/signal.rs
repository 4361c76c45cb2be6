//! Cross-worker termination signal.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// A sticky terminate flag shared by every worker of a game.
///
/// Workers check [`is_set`](Self::is_set) at every loop head and race
/// every blocking wait against [`wait`](Self::wait), so the signal is
/// observed within one tick.
#[derive(Debug, Default)]
pub struct Terminate {
    flag: AtomicBool,
    notify: Notify,
}

impl Terminate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag and wake every waiting worker. Idempotent.
    pub fn signal(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Complete once the flag is raised; completes immediately if it
    /// already is.
    pub async fn wait(&self) {
        while !self.is_set() {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register interest before the re-check so a concurrent
            // `signal` cannot slip between the check and the await.
            notified.as_mut().enable();
            if self.is_set() {
                return;
            }
            notified.await;
        }
    }
}
