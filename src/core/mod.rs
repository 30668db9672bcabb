//! Runtime core: the scheduler and its worker.
//!
//! The public API from this module is [`Scheduler`] (handle), [`SchedulerBuilder`],
//! [`SchedulerConfig`] and the [`Status`] snapshot.
//!
//! Internal modules:
//! - [`command`]: messages handed from handles to the worker;
//! - [`worker`]: drain loop, per-member phase machine, interruptible waits, blocking suspension;
//! - [`builder`]: wires bus, subscriber listener and worker;
//! - [`scheduler`]: cloneable handle.

mod builder;
mod command;
mod config;
mod scheduler;
mod worker;

pub use builder::SchedulerBuilder;
pub use command::Status;
pub use config::SchedulerConfig;
pub use scheduler::Scheduler;
