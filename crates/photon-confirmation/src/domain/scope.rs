//! # Cancellation Scopes
//!
//! A hierarchical, idempotent cancellation token. Scopes form a tree:
//! cancelling one cancels every descendant, including children derived
//! *after* the cancellation. Cancellation is monotonic (once cancelled, a
//! scope stays cancelled) and it only ever stops work; nothing in this
//! module settles an outcome.

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::watch;

/// A handle to one node of a cancellation tree.
///
/// Handles are cheap to clone; clones share the underlying scope. The
/// coordinator derives one child scope per confirmation attempt and hands
/// clones to every watcher and gateway involved in it.
#[derive(Clone)]
pub struct CancellationScope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    /// Flag and child registry behind a single lock, so a child can never
    /// register concurrently with a cancellation sweep and be missed.
    state: Mutex<ScopeState>,
    /// Async side of the flag; waiters wake when it flips to `true`.
    signal: watch::Sender<bool>,
}

struct ScopeState {
    cancelled: bool,
    children: Vec<Weak<ScopeInner>>,
}

impl CancellationScope {
    /// Create a root scope.
    #[must_use]
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            inner: Arc::new(ScopeInner {
                state: Mutex::new(ScopeState {
                    cancelled: false,
                    children: Vec::new(),
                }),
                signal,
            }),
        }
    }

    /// Derive a child scope.
    ///
    /// The child is cancelled whenever this scope is cancelled. A child
    /// derived from an already-cancelled parent is born cancelled.
    /// Cancelling the child never affects the parent.
    #[must_use]
    pub fn child(&self) -> Self {
        let child = CancellationScope::new();
        let mut state = self.inner.state.lock();
        if state.cancelled {
            drop(state);
            child.cancel();
        } else {
            state.children.retain(|weak| weak.strong_count() > 0);
            state.children.push(Arc::downgrade(&child.inner));
        }
        child
    }

    /// Cancel this scope and every descendant. Idempotent.
    pub fn cancel(&self) {
        let children = {
            let mut state = self.inner.state.lock();
            if state.cancelled {
                return;
            }
            state.cancelled = true;
            std::mem::take(&mut state.children)
        };

        self.inner.signal.send_replace(true);

        // Descendants are cancelled outside our own lock; the tree shape
        // means each lock is taken at most once per sweep.
        for weak in children {
            if let Some(inner) = weak.upgrade() {
                CancellationScope { inner }.cancel();
            }
        }
    }

    /// Whether this scope has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.state.lock().cancelled
    }

    /// Wait until this scope is cancelled.
    ///
    /// Resolves immediately if the scope is already cancelled. Any number
    /// of waiters may be pending at once.
    pub async fn cancelled(&self) {
        let mut signal = self.inner.signal.subscribe();
        // The sender lives inside our own Arc, so it cannot drop while we
        // hold `self`; `wait_for` can only resolve, never error.
        let _ = signal.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancellationScope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("CancellationScope")
            .field("cancelled", &state.cancelled)
            .field("children", &state.children.len())
            .finish()
    }
}
