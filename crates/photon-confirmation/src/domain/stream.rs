//! # Notification Streams
//!
//! The push half of the engine's hybrid watchers: an explicitly
//! cancellable sequence of notifications. The sequence never ends on its
//! own; it ends when its scope is cancelled or every sender is dropped,
//! and ending never synthesizes a notification.

use crate::domain::scope::CancellationScope;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::Stream;

/// Sending half of a notification channel.
///
/// Held by gateway implementations (and test fixtures) to push
/// notifications at subscribers.
pub struct NotificationSender<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for NotificationSender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> NotificationSender<T> {
    /// Push one notification. Returns `false` once the receiving stream
    /// is gone.
    pub fn send(&self, notification: T) -> bool {
        self.tx.send(notification).is_ok()
    }
}

/// Receiving half of a notification channel: a lazily consumed,
/// scope-governed sequence.
///
/// Consumed either through the inherent [`recv`](NotificationStream::recv)
/// or as a [`tokio_stream::Stream`].
pub struct NotificationStream<T> {
    rx: mpsc::UnboundedReceiver<T>,
    scope: CancellationScope,
    /// One-shot cancellation future for the `Stream` impl; never polled
    /// again after completion (guarded by `done`).
    cancelled: Pin<Box<dyn Future<Output = ()> + Send>>,
    done: bool,
}

/// Create a notification channel governed by `scope`.
///
/// The stream yields items in send order until the scope is cancelled or
/// every sender is dropped, then yields `None` forever.
pub fn notification_channel<T>(
    scope: &CancellationScope,
) -> (NotificationSender<T>, NotificationStream<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let cancelled = {
        let scope = scope.clone();
        Box::pin(async move { scope.cancelled().await })
    };
    (
        NotificationSender { tx },
        NotificationStream {
            rx,
            scope: scope.clone(),
            cancelled,
            done: false,
        },
    )
}

impl<T> NotificationStream<T> {
    /// Receive the next notification.
    ///
    /// Returns `None` once the stream's scope is cancelled or every
    /// sender is gone. Cancellation wins over already-queued items: a
    /// cancelled stream delivers nothing further.
    pub async fn recv(&mut self) -> Option<T> {
        if self.done {
            return None;
        }
        let scope = self.scope.clone();
        tokio::select! {
            biased;
            () = scope.cancelled() => {
                self.done = true;
                None
            }
            item = self.rx.recv() => {
                if item.is_none() {
                    self.done = true;
                }
                item
            }
        }
    }

    /// The scope governing this stream.
    #[must_use]
    pub fn scope(&self) -> &CancellationScope {
        &self.scope
    }
}

impl<T> Stream for NotificationStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }
        if this.cancelled.as_mut().poll(cx).is_ready() {
            this.done = true;
            return Poll::Ready(None);
        }
        match this.rx.poll_recv(cx) {
            Poll::Ready(Some(item)) => Poll::Ready(Some(item)),
            Poll::Ready(None) => {
                this.done = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
