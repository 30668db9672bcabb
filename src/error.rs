//! Error types used by the phaseq scheduler.
//!
//! Interrupted waits are **not** errors: they degrade into an `exiting`/`finished`
//! pair on the event stream. The only failure a caller can observe is handing work
//! to a scheduler whose worker is no longer running.

use thiserror::Error;

/// # Errors produced by the scheduler handle.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// Worker is gone (its tokio runtime shut down); the request was not accepted.
    #[error("scheduler worker closed")]
    Closed,
}

impl SchedulerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use phaseq::SchedulerError;
    ///
    /// assert_eq!(SchedulerError::Closed.as_label(), "scheduler_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SchedulerError::Closed => "scheduler_closed",
        }
    }
}
