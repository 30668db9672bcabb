//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`LifecycleEvent`] to multiple
//! subscribers **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&event)` returns immediately.
//! - Per-subscriber FIFO (queue order), no drops.
//! - Panics inside subscribers are caught and logged (isolation); the worker keeps going.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//!
//! ## Diagram
//! ```text
//!    emit(&event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

use super::Subscribe;
use crate::events::LifecycleEvent;
use crate::members::Member;

/// Per-subscriber channel with metadata.
struct SubscriberChannel<M: Member> {
    name: &'static str,
    sender: mpsc::UnboundedSender<Arc<LifecycleEvent<M>>>,
}

/// Composite fan-out with per-subscriber queues and worker tasks.
pub struct SubscriberSet<M: Member> {
    channels: Vec<SubscriberChannel<M>>,
    workers: Vec<JoinHandle<()>>,
}

impl<M: Member> SubscriberSet<M> {
    /// Creates a new set and spawns one worker per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe<M>>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::unbounded_channel::<Arc<LifecycleEvent<M>>>();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        warn!(
                            subscriber = sub.name(),
                            info = %panic_message(panic_err.as_ref()),
                            "subscriber panicked"
                        );
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self { channels, workers }
    }

    /// Fan-out one event to all subscribers (non-blocking).
    pub fn emit(&self, event: &LifecycleEvent<M>) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Fan-out a pre-allocated event.
    ///
    /// A subscriber whose worker has already stopped is skipped with a warning.
    pub fn emit_arc(&self, event: Arc<LifecycleEvent<M>>) {
        for channel in &self.channels {
            if channel.sender.send(Arc::clone(&event)).is_err() {
                warn!(subscriber = channel.name, "subscriber dropped event: worker closed");
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    ///
    /// Events already queued are still delivered.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

fn panic_message(any: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
