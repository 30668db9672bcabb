use tokio::sync::oneshot;

use crate::members::Member;

/// Request handed from a [`Scheduler`](crate::Scheduler) handle to the worker.
pub(crate) enum Command<M: Member> {
    /// Append members (ordered batch) to the tail of the queue.
    Enqueue(Vec<M>),
    /// Abandon everything and run exactly this member next.
    EnqueueExclusively(M),
    /// Resume the outstanding blocking suspension, if any.
    Unblock,
    /// Cancel the current run, clear the queue, release any suspension.
    CancelAll,
    /// Report a point-in-time [`Status`].
    Status(oneshot::Sender<Status<M::Id>>),
}

/// Point-in-time snapshot of the scheduler, answered by the worker itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status<Id> {
    /// Member currently occupying the active slot.
    pub active: Option<Id>,
    /// `true` while a blocking member waits for [`Scheduler::unblock`](crate::Scheduler::unblock).
    pub holding: bool,
    /// Members queued behind the active one.
    pub pending: usize,
    /// `true` while the drain loop is running.
    pub running: bool,
}
