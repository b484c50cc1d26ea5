//! Cancellation of loads that outlive their view.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;
use tracing::debug;

/// Shared flag telling a load that nobody wants its result any more.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        if !self.inner.cancelled.swap(true, Ordering::AcqRel) {
            self.inner.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Completes once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        loop {
            // register before checking, so a concurrent cancel is not missed
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Hands out one token per navigation and cancels the previous one.
#[derive(Debug, Default)]
pub struct Navigator {
    current: Option<CancellationToken>,
    navigations: u64,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new view. Any load still running for the previous view
    /// becomes stale.
    pub fn navigate(&mut self) -> CancellationToken {
        self.leave();
        self.navigations += 1;
        debug!(navigation = self.navigations, "view mounted");
        let token = CancellationToken::new();
        self.current = Some(token.clone());
        token
    }

    /// Tear the current view down.
    pub fn leave(&mut self) {
        if let Some(previous) = self.current.take() {
            debug!(navigation = self.navigations, "view torn down");
            previous.cancel();
        }
    }

    pub fn navigations(&self) -> u64 {
        self.navigations
    }
}
