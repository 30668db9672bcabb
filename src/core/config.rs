//! # Scheduler configuration.
//!
//! Provides [`SchedulerConfig`], passed to
//! [`Scheduler::builder`](crate::Scheduler::builder) / [`Scheduler::new`](crate::Scheduler::new).

use std::time::Duration;

use crate::members::Timing;

/// Runtime settings for one scheduler.
///
/// ## Field semantics
/// - `name`: label attached to every tracing record of the worker
/// - `reduce_motion`: treat entering/exiting transitions as zero-length
///   (rest and end delay are kept; phases are still emitted)
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Label used in logs.
    pub name: String,

    /// Skip transition waits.
    pub reduce_motion: bool,
}

impl SchedulerConfig {
    /// Transition length to wait for a member with the given timing.
    #[inline]
    pub fn transition_for(&self, timing: &Timing) -> Duration {
        if self.reduce_motion {
            Duration::ZERO
        } else {
            timing.transition
        }
    }
}

impl Default for SchedulerConfig {
    /// Default configuration:
    ///
    /// - `name = "phaseq"`
    /// - `reduce_motion = false`
    fn default() -> Self {
        Self {
            name: String::from("phaseq"),
            reduce_motion: false,
        }
    }
}
