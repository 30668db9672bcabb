//! # Event bus for lifecycle events.
//!
//! [`Bus`] is a small registry of per-subscriber unbounded queues fed from one
//! emission point (the scheduler worker).
//!
//! ## Architecture
//! ```text
//! Publisher (one):              Subscribers (many):
//!                          ┌──► [queue 1] ──► EventStream 1
//!   worker ── publish() ───┼──► [queue 2] ──► EventStream 2
//!                          └──► [queue N] ──► subscriber listener ──► SubscriberSet
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits on a reader.
//! - **Unbounded**: slow readers never lose events; they just fall behind.
//! - **Per-reader FIFO**: every stream observes events in emission order.
//! - **No replay**: a stream only gets events published after it subscribed.
//! - **Pruning**: queues whose stream was dropped are removed on the next publish.

use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use super::event::LifecycleEvent;
use crate::members::Member;

type Senders<M> = Vec<mpsc::UnboundedSender<LifecycleEvent<M>>>;

/// Fan-out channel for lifecycle events.
///
/// Cloneable: clones share the same subscriber registry.
pub(crate) struct Bus<M: Member> {
    senders: Arc<Mutex<Senders<M>>>,
}

impl<M: Member> Clone for Bus<M> {
    fn clone(&self) -> Self {
        Self {
            senders: Arc::clone(&self.senders),
        }
    }
}

impl<M: Member> Bus<M> {
    pub fn new() -> Self {
        Self {
            senders: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Publishes an event to every live stream.
    ///
    /// If there are no streams the event is dropped.
    pub fn publish(&self, ev: LifecycleEvent<M>) {
        let mut senders = self.senders.lock().unwrap_or_else(PoisonError::into_inner);
        senders.retain(|tx| tx.send(ev.clone()).is_ok());
    }

    /// Creates a new stream that will observe subsequent events.
    pub fn subscribe(&self) -> EventStream<M> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        EventStream { rx }
    }

    /// Number of registered streams (including ones dropped since the last publish).
    #[cfg(test)]
    pub fn receiver_count(&self) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Ordered sequence of [`LifecycleEvent`]s observed by one subscriber.
///
/// Obtained from [`Scheduler::subscribe`](crate::Scheduler::subscribe).
/// Ends (`None`) once the scheduler worker and all scheduler handles are gone.
///
/// Also implements [`futures::Stream`], so combinators from `futures::StreamExt` apply.
pub struct EventStream<M: Member> {
    rx: mpsc::UnboundedReceiver<LifecycleEvent<M>>,
}

impl<M: Member> EventStream<M> {
    /// Waits for the next event.
    pub async fn recv(&mut self) -> Option<LifecycleEvent<M>> {
        self.rx.recv().await
    }

    /// Returns the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<LifecycleEvent<M>> {
        self.rx.try_recv().ok()
    }
}

impl<M: Member> Stream for EventStream<M> {
    type Item = LifecycleEvent<M>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
