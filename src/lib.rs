//! # phaseq
//!
//! **phaseq** is a single-consumer lifecycle scheduler for Rust.
//!
//! It serializes otherwise-concurrent presentation requests (transient
//! notifications, banners, toasts) so exactly one item is active at a time,
//! drives each item through a fixed phase sequence, and lets observers react to
//! every phase change without owning any timing logic.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │    Member    │   │    Member    │   │    Member    │
//!     │   (timed)    │   │  (blocking)  │   │   (timed)    │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Scheduler handle (Clone)                                         │
//! │  enqueue / enqueue_all / enqueue_exclusively / unblock /          │
//! │  cancel_all / status / subscribe                                  │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼ command channel
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Worker (single tokio task)                                       │
//! │  - FIFO queue                                                     │
//! │  - active slot (at most one member)                               │
//! │  - blocking suspension (oneshot)                                  │
//! │  - run token (CancellationToken)                                  │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼ publish(LifecycleEvent)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                 Bus (per-subscriber unbounded queues)             │
//! └───────────┬─────────────────────┬─────────────────────────────────┘
//!             ▼                     ▼
//!       EventStream           subscriber listener ──► SubscriberSet
//!      (subscribe())                                   ┌────┼────┐
//!                                                      ▼    ▼    ▼
//!                                                    sub1 sub2 subN
//! ```
//!
//! ### Lifecycle
//! ```text
//! loop {
//!   ├─► pop head of queue (FIFO)
//!   ├─► run cancelled? ─► publish Rejected, continue
//!   ├─► publish Entering, wait(transition)
//!   ├─► hold:
//!   │     ├─ Timed    ─► wait(rest)
//!   │     └─ Blocking ─► wait for unblock() (no timeout)
//!   ├─► publish Exiting, wait(transition)
//!   ├─► wait(end_delay)
//!   └─► publish Finished
//!
//!   any interrupted wait ─► publish Exiting (if not yet) + Finished
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                        |
//! |-------------------|---------------------------------------------------------------|-------------------------------------------|
//! | **Scheduling**    | FIFO queue, one active member, exclusivity and cancellation.  | [`Scheduler`], [`SchedulerBuilder`]       |
//! | **Members**       | Capability set the scheduler is generic over.                 | [`Member`], [`Mode`], [`Timing`], [`Item`]|
//! | **Events**        | Ordered lifecycle events and pull-style streams.              | [`LifecycleEvent`], [`Phase`], [`EventStream`] |
//! | **Subscriber API**| Push-style observers with per-subscriber workers.             | [`Subscribe`], [`SubscriberSet`]          |
//! | **Errors**        | Hand-off failures.                                            | [`SchedulerError`]                        |
//! | **Configuration** | Per-scheduler settings.                                       | [`SchedulerConfig`]                       |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber _(demo/reference only)_.
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
//!     let timing = Timing::default()
//!         .with_transition(Duration::from_millis(10))
//!         .with_rest(Duration::from_millis(20));
//!     scheduler.enqueue(Item::blocking("offline", timing))?;
//!
//!     while let Some(ev) = events.recv().await {
//!         match ev.phase {
//!             Phase::Entering => {
//!                 tokio::time::sleep(Duration::from_millis(50)).await;
//!                 scheduler.unblock();
//!             }
//!             Phase::Finished => break,
//!             _ => {}
//!         }
//!     }
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod members;
mod subscribers;

// ---- Public re-exports ----

pub use self::core::{Scheduler, SchedulerBuilder, SchedulerConfig, Status};
pub use error::SchedulerError;
pub use events::{EventStream, LifecycleEvent, Phase};
pub use members::{Item, ItemId, Member, Mode, Timing};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
