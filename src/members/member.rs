//! # Member contract
//!
//! A [`Member`] is anything that can be queued on a [`Scheduler`](crate::Scheduler).
//! The scheduler never inspects its shape beyond three capabilities:
//! - a stable, comparable identity ([`Member::id`]);
//! - a behavioral [`Mode`];
//! - a [`Timing`] bundle (transition / rest / trailing delay).
//!
//! ## Rules
//! - Members are immutable once enqueued; the scheduler only threads them through phases.
//! - Identities must be unique within a queue's lifetime (observers key on them).
//! - `Timing::rest` is only consulted for [`Mode::Timed`].

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

/// How a member leaves its holding state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Advances to `exiting` on its own once [`Timing::rest`] has elapsed.
    Timed,

    /// Holds until [`Scheduler::unblock`](crate::Scheduler::unblock) is called.
    ///
    /// There is no timeout: absent `unblock` or a cancellation, the member holds forever.
    Blocking,
}

impl Mode {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Mode::Timed => "timed",
            Mode::Blocking => "blocking",
        }
    }
}

/// Timing values attached to a member.
///
/// ## Field semantics
/// - `transition`: length of both the entering and the exiting transition
/// - `rest`: hold duration for [`Mode::Timed`] members (ignored for [`Mode::Blocking`])
/// - `end_delay`: extra wait after the exiting transition, before `finished`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timing {
    /// Entering and exiting transition length.
    pub transition: Duration,
    /// Hold length for timed members.
    pub rest: Duration,
    /// Trailing delay before `finished`.
    pub end_delay: Duration,
}

impl Timing {
    /// Creates a timing bundle from explicit values.
    pub const fn new(transition: Duration, rest: Duration, end_delay: Duration) -> Self {
        Self {
            transition,
            rest,
            end_delay,
        }
    }

    /// All three values set to zero.
    pub const fn immediate() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    /// Replaces the entering and exiting transition length.
    #[inline]
    pub fn with_transition(mut self, d: Duration) -> Self {
        self.transition = d;
        self
    }

    /// Replaces how long a timed member holds.
    #[inline]
    pub fn with_rest(mut self, d: Duration) -> Self {
        self.rest = d;
        self
    }

    /// Replaces the pause between the exit transition and `Finished`.
    #[inline]
    pub fn with_end_delay(mut self, d: Duration) -> Self {
        self.end_delay = d;
        self
    }
}

impl Default for Timing {
    /// Default timing:
    ///
    /// - `transition = 300ms`
    /// - `rest = 3s`
    /// - `end_delay = 0s`
    fn default() -> Self {
        Self::new(
            Duration::from_millis(300),
            Duration::from_secs(3),
            Duration::ZERO,
        )
    }
}

/// Capability set every queueable item must satisfy.
///
/// Implementors are cloned into each [`LifecycleEvent`](crate::LifecycleEvent),
/// so keep them cheap to clone (wrap heavy payloads in `Arc`).
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use phaseq::{Member, Mode, Timing};
///
/// #[derive(Clone)]
/// struct Banner {
///     key: u32,
///     sticky: bool,
/// }
///
/// impl Member for Banner {
///     type Id = u32;
///
///     fn id(&self) -> u32 { self.key }
///
///     fn mode(&self) -> Mode {
///         if self.sticky { Mode::Blocking } else { Mode::Timed }
///     }
///
///     fn timing(&self) -> Timing {
///         Timing::default().with_rest(Duration::from_secs(5))
///     }
/// }
/// ```
pub trait Member: Clone + Send + Sync + 'static {
    /// Stable identity, unique within a queue's lifetime.
    type Id: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Returns the member identity.
    fn id(&self) -> Self::Id;

    /// Returns how the member leaves its holding state.
    fn mode(&self) -> Mode;

    /// Returns the member's timing values.
    fn timing(&self) -> Timing;
}
