//! # Scheduler: handle to the single-consumer lifecycle scheduler.
//!
//! A [`Scheduler`] accepts members in FIFO order and drives exactly one of them
//! at a time through `Entering → (holding) → Exiting → Finished`, publishing a
//! [`LifecycleEvent`](crate::LifecycleEvent) at every transition.
//!
//! ## High-level architecture
//! ```text
//! enqueue / enqueue_all / enqueue_exclusively / unblock / cancel_all / status
//!          │            (cheap Clone handle, non-blocking hand-off)
//!          ▼
//!   command channel (unbounded, FIFO)
//!          ▼
//!   Worker (one tokio task; sole owner of queue, active slot, suspension)
//!          │ publish(LifecycleEvent)
//!          ▼
//!   Bus ──► EventStream (subscribe())
//!       └─► subscriber listener ──► SubscriberSet ──► Subscribe::on_event
//! ```
//!
//! ## Cancellation paths
//! - [`Scheduler::cancel_all`]: cancels the current run and clears the queue. The active
//!   member finishes cleanly (`Exiting`, `Finished`); members enqueued afterwards but popped
//!   by the same run are `Rejected`.
//! - [`Scheduler::enqueue_exclusively`]: same for the active member, but queued members are
//!   discarded **silently** (no `Rejected`) and the given member runs next in a fresh run.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use phaseq::{Item, Phase, Scheduler, SchedulerConfig, Timing};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = Scheduler::new(SchedulerConfig::default());
//!     let mut events = scheduler.subscribe();
//!
//!     let quick = Timing::new(Duration::from_millis(5), Duration::from_millis(10), Duration::ZERO);
//!     scheduler.enqueue(Item::timed("saved", quick))?;
//!
//!     while let Some(ev) = events.recv().await {
//!         println!("{} -> {}", ev.member.payload(), ev.phase);
//!         if ev.phase.is_terminal() {
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use tokio::sync::{mpsc, oneshot};
use tracing::trace;

use super::{
    builder::SchedulerBuilder,
    command::{Command, Status},
    config::SchedulerConfig,
};
use crate::{
    error::SchedulerError,
    events::{Bus, EventStream},
    members::Member,
};

/// Cloneable handle to a running scheduler.
///
/// All operations hand off to the worker and return immediately; none of them
/// waits for a member to be processed. The worker stops (cleanly finishing the
/// active member) once every handle is dropped.
#[derive(Clone)]
pub struct Scheduler<M: Member> {
    tx: mpsc::UnboundedSender<Command<M>>,
    bus: Bus<M>,
}

impl<M: Member> Scheduler<M> {
    /// Creates a scheduler without push-style subscribers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(cfg: SchedulerConfig) -> Self {
        Self::builder(cfg).build()
    }

    /// Returns a builder (to attach [`Subscribe`](crate::Subscribe) implementations).
    pub fn builder(cfg: SchedulerConfig) -> SchedulerBuilder<M> {
        SchedulerBuilder::new(cfg)
    }

    pub(crate) fn from_parts(tx: mpsc::UnboundedSender<Command<M>>, bus: Bus<M>) -> Self {
        Self { tx, bus }
    }

    /// Appends one member to the tail of the queue.
    pub fn enqueue(&self, member: M) -> Result<(), SchedulerError> {
        self.send(Command::Enqueue(vec![member]))
    }

    /// Appends an ordered batch; relative order is preserved. An empty batch is a no-op.
    pub fn enqueue_all<I>(&self, members: I) -> Result<(), SchedulerError>
    where
        I: IntoIterator<Item = M>,
    {
        let batch: Vec<M> = members.into_iter().collect();
        if batch.is_empty() {
            return Ok(());
        }
        self.send(Command::Enqueue(batch))
    }

    /// Replaces all pending and active work with `member`.
    ///
    /// - the active member (if any) still reaches `Finished` cleanly;
    /// - queued members are discarded without any event;
    /// - `member` then runs in a fresh run.
    pub fn enqueue_exclusively(&self, member: M) -> Result<(), SchedulerError> {
        self.send(Command::EnqueueExclusively(member))
    }

    /// Lets a holding blocking member advance to `Exiting`.
    ///
    /// No-op when no blocking member is holding (including one still in its
    /// entering transition): the call is not remembered.
    pub fn unblock(&self) {
        if self.send(Command::Unblock).is_err() {
            trace!("unblock ignored: worker closed");
        }
    }

    /// Cancels the current run and clears the queue.
    ///
    /// The active member finishes cleanly. Idempotent.
    pub fn cancel_all(&self) {
        if self.send(Command::CancelAll).is_err() {
            trace!("cancel_all ignored: worker closed");
        }
    }

    /// Creates a new stream observing every subsequent lifecycle event.
    pub fn subscribe(&self) -> EventStream<M> {
        self.bus.subscribe()
    }

    /// Asks the worker for a point-in-time snapshot.
    ///
    /// The answer is ordered after every command sent before this call.
    pub async fn status(&self) -> Result<Status<M::Id>, SchedulerError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Status(tx))?;
        rx.await.map_err(|_| SchedulerError::Closed)
    }

    fn send(&self, cmd: Command<M>) -> Result<(), SchedulerError> {
        self.tx.send(cmd).map_err(|_| SchedulerError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::{self, Instant};

    use super::*;
    use crate::events::{LifecycleEvent, Phase};
    use crate::members::{Item, Timing};
    use crate::subscribers::Subscribe;

    type Note = Item<&'static str>;

    fn ms(transition: u64, rest: u64, end_delay: u64) -> Timing {
        Timing::new(
            Duration::from_millis(transition),
            Duration::from_millis(rest),
            Duration::from_millis(end_delay),
        )
    }

    async fn next(events: &mut EventStream<Note>) -> (&'static str, Phase) {
        let ev = time::timeout(Duration::from_secs(24 * 3600), events.recv())
            .await
            .expect("no event within a day")
            .expect("stream closed");
        (*ev.member.payload(), ev.phase)
    }

    async fn assert_quiet(events: &mut EventStream<Note>) {
        time::sleep(Duration::from_secs(3600)).await;
        assert!(events.try_recv().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_member_runs_full_sequence() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();
        let start = Instant::now();

        sched.enqueue(Item::timed("a", ms(50, 100, 10))).unwrap();

        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        assert!(start.elapsed() >= Duration::from_millis(150));
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert!(start.elapsed() >= Duration::from_millis(210));
    }

    #[tokio::test(start_paused = true)]
    async fn test_members_drain_in_fifo_order_one_at_a_time() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched
            .enqueue_all([Item::timed("a", ms(10, 20, 0)), Item::timed("b", ms(10, 20, 0))])
            .unwrap();
        sched.enqueue(Item::timed("c", ms(10, 20, 0))).unwrap();

        let mut seen = Vec::new();
        for _ in 0..9 {
            seen.push(next(&mut events).await);
        }
        let expected: Vec<_> = ["a", "b", "c"]
            .into_iter()
            .flat_map(|n| [(n, Phase::Entering), (n, Phase::Exiting), (n, Phase::Finished)])
            .collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocking_member_holds_without_timeout() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::blocking("sticky", ms(50, 10, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("sticky", Phase::Entering));

        // `rest` is ignored for blocking members.
        assert_quiet(&mut events).await;
        let status = sched.status().await.unwrap();
        assert!(status.holding);

        sched.unblock();
        assert_eq!(next(&mut events).await, ("sticky", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("sticky", Phase::Finished));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unblock_is_noop_without_holding_member() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();
        sched.unblock();

        // Timed hold is not shortened.
        let start = Instant::now();
        sched.enqueue(Item::timed("t", ms(50, 100, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("t", Phase::Entering));
        sched.unblock();
        assert_eq!(next(&mut events).await, ("t", Phase::Exiting));
        assert!(start.elapsed() >= Duration::from_millis(150));
        assert_eq!(next(&mut events).await, ("t", Phase::Finished));

        // Unblock during the entering transition is not remembered.
        sched.enqueue(Item::blocking("b", ms(50, 0, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("b", Phase::Entering));
        sched.unblock();
        assert_quiet(&mut events).await;

        sched.unblock();
        assert_eq!(next(&mut events).await, ("b", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("b", Phase::Finished));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_rejects_members_popped_after_cancellation() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::blocking("a", ms(50, 0, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        time::sleep(Duration::from_millis(100)).await;

        sched.cancel_all();
        sched.enqueue(Item::timed("b", ms(10, 10, 0))).unwrap();
        sched.enqueue(Item::timed("c", ms(10, 10, 0))).unwrap();

        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert_eq!(next(&mut events).await, ("b", Phase::Rejected));
        assert_eq!(next(&mut events).await, ("c", Phase::Rejected));
        assert_quiet(&mut events).await;

        // A later enqueue starts a fresh run.
        sched.enqueue(Item::timed("d", ms(10, 10, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("d", Phase::Entering));
        assert_eq!(next(&mut events).await, ("d", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("d", Phase::Finished));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exclusive_replacement_discards_queued_members_silently() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::timed("a", ms(50, 100, 0))).unwrap();
        sched.enqueue(Item::timed("b", ms(50, 100, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));

        sched.enqueue_exclusively(Item::timed("c", ms(50, 100, 0))).unwrap();

        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        // "b" was queued but never started: it gets no `Rejected`, unlike the cancel_all path.
        assert_eq!(next(&mut events).await, ("c", Phase::Entering));
        assert_eq!(next(&mut events).await, ("c", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("c", Phase::Finished));
        assert_quiet(&mut events).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_exclusive_replacement_releases_blocking_member() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::blocking("a", ms(10, 0, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        time::sleep(Duration::from_millis(50)).await;

        sched.enqueue_exclusively(Item::timed("c", ms(10, 10, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert_eq!(next(&mut events).await, ("c", Phase::Entering));
        assert_eq!(next(&mut events).await, ("c", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("c", Phase::Finished));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_is_idempotent() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.cancel_all();
        sched.cancel_all();
        assert_quiet(&mut events).await;

        sched.enqueue(Item::timed("a", ms(50, 10_000, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        sched.cancel_all();
        sched.cancel_all();

        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert_quiet(&mut events).await;

        let status = sched.status().await.unwrap();
        assert_eq!(
            status,
            Status {
                active: None,
                holding: false,
                pending: 0,
                running: false,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_interrupted_exit_transition_finishes_immediately() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::timed("a", ms(100, 0, 500))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));

        let exited_at = Instant::now();
        sched.cancel_all();
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert!(exited_at.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_end_delay_finishes_once() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::timed("a", ms(10, 10, 1_000))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));

        // exit transition is over; the member sits in its end delay
        time::sleep(Duration::from_millis(100)).await;
        let cancelled_at = Instant::now();
        sched.cancel_all();
        sched.enqueue(Item::timed("b", ms(10, 10, 0))).unwrap();

        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert!(cancelled_at.elapsed() < Duration::from_millis(10));
        assert_eq!(next(&mut events).await, ("b", Phase::Rejected));
        assert_quiet(&mut events).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_blocking_members_each_need_unblock() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        let b = Item::blocking("b", ms(10, 0, 0));
        let b_id = b.id();
        sched.enqueue_all([Item::blocking("a", ms(10, 0, 0)), b]).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        time::sleep(Duration::from_millis(50)).await;

        sched.unblock();
        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert_eq!(next(&mut events).await, ("b", Phase::Entering));
        assert_quiet(&mut events).await;

        let status = sched.status().await.unwrap();
        assert_eq!(status.active, Some(b_id));
        assert!(status.holding);
        assert_eq!(status.pending, 0);

        sched.unblock();
        assert_eq!(next(&mut events).await, ("b", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("b", Phase::Finished));
        assert_quiet(&mut events).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_delay_precedes_finished() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::timed("a", ms(0, 0, 500))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        let exited_at = Instant::now();
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert!(exited_at.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reduce_motion_skips_transitions() {
        let cfg = SchedulerConfig {
            reduce_motion: true,
            ..SchedulerConfig::default()
        };
        let sched = Scheduler::new(cfg);
        let mut events = sched.subscribe();
        let start = Instant::now();

        sched.enqueue(Item::timed("a", ms(1_000, 100, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(1_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_enqueue_after_run_finished_restarts_drain() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::timed("a", Timing::immediate())).unwrap();
        for phase in [Phase::Entering, Phase::Exiting, Phase::Finished] {
            assert_eq!(next(&mut events).await, ("a", phase));
        }
        assert_quiet(&mut events).await;
        assert!(!sched.status().await.unwrap().running);

        sched.enqueue(Item::timed("b", Timing::immediate())).unwrap();
        for phase in [Phase::Entering, Phase::Exiting, Phase::Finished] {
            assert_eq!(next(&mut events).await, ("b", phase));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_reports_active_and_pending() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        let a = Item::blocking("a", ms(10, 0, 0));
        let a_id = a.id();
        sched.enqueue_all([a, Item::timed("b", ms(10, 10, 0))]).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));
        time::sleep(Duration::from_millis(50)).await;

        let status = sched.status().await.unwrap();
        assert_eq!(status.active, Some(a_id));
        assert!(status.holding);
        assert_eq!(status.pending, 1);
        assert!(status.running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_all_handles_finishes_active_member() {
        let sched = Scheduler::new(SchedulerConfig::default());
        let mut events = sched.subscribe();

        sched.enqueue(Item::blocking("a", ms(10, 0, 0))).unwrap();
        sched.enqueue(Item::timed("b", ms(10, 10, 0))).unwrap();
        assert_eq!(next(&mut events).await, ("a", Phase::Entering));

        drop(sched);
        assert_eq!(next(&mut events).await, ("a", Phase::Exiting));
        assert_eq!(next(&mut events).await, ("a", Phase::Finished));
        assert!(events.recv().await.is_none());
    }

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<(&'static str, Phase)>>,
    }

    #[async_trait]
    impl Subscribe<Note> for Recorder {
        async fn on_event(&self, ev: &LifecycleEvent<Note>) {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push((*ev.member.payload(), ev.phase));
            }
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_receive_every_event() {
        let rec = Arc::new(Recorder::default());
        let sched = Scheduler::<Note>::builder(SchedulerConfig::default())
            .with_subscriber(rec.clone())
            .build();
        let mut events = sched.subscribe();

        sched.enqueue(Item::timed("a", ms(10, 10, 0))).unwrap();
        sched.enqueue(Item::timed("b", ms(10, 10, 0))).unwrap();
        for _ in 0..6 {
            next(&mut events).await;
        }

        for _ in 0..100 {
            if rec.seen.lock().unwrap().len() == 6 {
                break;
            }
            time::sleep(Duration::from_millis(1)).await;
        }
        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec![
                ("a", Phase::Entering),
                ("a", Phase::Exiting),
                ("a", Phase::Finished),
                ("b", Phase::Entering),
                ("b", Phase::Exiting),
                ("b", Phase::Finished),
            ]
        );
    }
}
