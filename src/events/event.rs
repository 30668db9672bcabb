//! # Lifecycle events emitted by the scheduler.
//!
//! The [`Phase`] enum classifies the transitions a member goes through:
//! ```text
//! not-started ──► Entering ──► (holding) ──► Exiting ──► Finished
//!      │
//!      └────────► Rejected   (popped after a cancellation, never started)
//! ```
//! The holding state is not emitted: it is the pause between `Entering` and `Exiting`.
//!
//! A [`LifecycleEvent`] pairs the member with the phase it just entered, and carries
//! metadata for logs (`seq`, `at`).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Per member, phases always arrive in state-machine order.
//!
//! ## Example
//! ```rust
//! use phaseq::{Item, LifecycleEvent, Phase, Timing};
//!
//! let item = Item::timed("hello", Timing::default());
//! let ev = LifecycleEvent::new(item.clone(), Phase::Entering);
//!
//! assert_eq!(ev.phase, Phase::Entering);
//! assert!(!ev.phase.is_terminal());
//! assert_eq!(ev, LifecycleEvent::new(item, Phase::Entering));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::members::Member;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Phase tag carried by every [`LifecycleEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Member became active; its entering transition is running.
    Entering,

    /// Member left its holding state (rest elapsed, unblocked, or interrupted).
    Exiting,

    /// Member reached its terminal state and no longer occupies the active slot.
    Finished,

    /// Member was popped after a cancellation and never started.
    ///
    /// Emitted alone: a rejected member produces no other phase.
    Rejected,
}

impl Phase {
    /// `true` for `Finished` and `Rejected`.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Finished | Phase::Rejected)
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Phase::Entering => "entering",
            Phase::Exiting => "exiting",
            Phase::Finished => "finished",
            Phase::Rejected => "rejected",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Immutable `(member, phase)` pair handed to observers.
///
/// Equality is structural over `(member.id(), phase)`; `seq` and `at` are ignored.
#[derive(Clone)]
pub struct LifecycleEvent<M: Member> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Member the event is about.
    pub member: M,
    /// Phase the member just entered.
    pub phase: Phase,
}

impl<M: Member> LifecycleEvent<M> {
    /// Creates a new event with current timestamp and next sequence number.
    pub fn new(member: M, phase: Phase) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            member,
            phase,
        }
    }

    /// Shorthand for `self.member.id()`.
    #[inline]
    pub fn id(&self) -> M::Id {
        self.member.id()
    }
}

impl<M: Member> PartialEq for LifecycleEvent<M> {
    fn eq(&self, other: &Self) -> bool {
        self.phase == other.phase && self.member.id() == other.member.id()
    }
}

impl<M: Member> Eq for LifecycleEvent<M> {}

impl<M: Member> fmt::Debug for LifecycleEvent<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleEvent")
            .field("seq", &self.seq)
            .field("member", &self.member.id())
            .field("phase", &self.phase)
            .finish()
    }
}
