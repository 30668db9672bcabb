//! Lifecycle events: types and fan-out bus.
//!
//! ## Contents
//! - [`Phase`], [`LifecycleEvent`] event classification and payload
//! - [`Bus`] per-subscriber unbounded registry written by the scheduler worker
//! - [`EventStream`] the read side handed to observers
//!
//! ## Quick reference
//! - **Publisher**: the scheduler worker (single emission point).
//! - **Consumers**: `Scheduler::subscribe()` streams and the subscriber listener
//!   feeding [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod event;

pub(crate) use bus::Bus;
pub use bus::EventStream;
pub use event::{LifecycleEvent, Phase};
