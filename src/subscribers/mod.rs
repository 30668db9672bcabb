//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out
//! used by the scheduler to push lifecycle events to user code.
//!
//! ## Architecture
//! ```text
//! worker ── publish ──► Bus ──► subscriber listener ──► SubscriberSet::emit(&event)
//!                                                             │
//!                                                  ┌──────────┼──────────┐
//!                                                  ▼          ▼          ▼
//!                                              LogWriter   Animator    Custom
//! ```
//!
//! Pull-style observers can use [`Scheduler::subscribe`](crate::Scheduler::subscribe)
//! instead and read an [`EventStream`](crate::EventStream) directly.

#[cfg(feature = "logging")]
mod embedded;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
