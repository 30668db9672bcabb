use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{Instrument, info_span};

use super::{config::SchedulerConfig, scheduler::Scheduler, worker::Worker};
use crate::{
    events::Bus,
    members::Member,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Scheduler`] with optional subscribers.
pub struct SchedulerBuilder<M: Member> {
    cfg: SchedulerConfig,
    subscribers: Vec<Arc<dyn Subscribe<M>>>,
}

impl<M: Member> SchedulerBuilder<M> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: SchedulerConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets push-style subscribers.
    ///
    /// Each subscriber receives every lifecycle event through a dedicated worker.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe<M>>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe<M>>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the scheduler and spawns its worker.
    ///
    /// Must be called from within a tokio runtime. Subscribers are attached
    /// before the worker starts, so they never miss an event.
    pub fn build(self) -> Scheduler<M> {
        let bus = Bus::new();

        if !self.subscribers.is_empty() {
            let mut events = bus.subscribe();
            let subs = SubscriberSet::new(self.subscribers);
            tokio::spawn(
                async move {
                    while let Some(ev) = events.recv().await {
                        subs.emit_arc(Arc::new(ev));
                    }
                    subs.shutdown().await;
                }
                .instrument(info_span!("subscriber_listener", scheduler = %self.cfg.name)),
            );
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let span = info_span!("scheduler", name = %self.cfg.name);
        tokio::spawn(Worker::new(self.cfg, bus.clone(), rx).run().instrument(span));

        Scheduler::from_parts(tx, bus)
    }
}
