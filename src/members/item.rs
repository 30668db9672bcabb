//! # Payload-backed member (`Item`)
//!
//! [`Item`] is a ready-made [`Member`] for callers that don't want to implement
//! the trait themselves: it pairs an arbitrary payload with a [`Mode`] and [`Timing`],
//! and receives a fresh [`ItemId`] from a process-wide counter.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use phaseq::{Item, Member, Mode, Timing};
//!
//! let saved = Item::timed("saved", Timing::default().with_rest(Duration::from_secs(2)));
//! let offline = Item::blocking("offline", Timing::default());
//!
//! assert_ne!(saved.id(), offline.id());
//! assert_eq!(offline.mode(), Mode::Blocking);
//! assert_eq!(*saved.payload(), "saved");
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use super::member::{Member, Mode, Timing};

/// Global counter for item identities.
static ITEM_SEQ: AtomicU64 = AtomicU64::new(1);

/// Identity of an [`Item`]. Unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    fn next() -> Self {
        Self(ITEM_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Member carrying a caller payload.
#[derive(Debug, Clone)]
pub struct Item<P> {
    id: ItemId,
    mode: Mode,
    timing: Timing,
    payload: P,
}

impl<P> Item<P> {
    /// Creates a new item with a freshly assigned id.
    pub fn new(payload: P, mode: Mode, timing: Timing) -> Self {
        Self {
            id: ItemId::next(),
            mode,
            timing,
            payload,
        }
    }

    /// Item that leaves on its own after `timing.rest`.
    #[inline]
    pub fn timed(payload: P, timing: Timing) -> Self {
        Self::new(payload, Mode::Timed, timing)
    }

    /// Item that holds until [`Scheduler::unblock`](crate::Scheduler::unblock).
    #[inline]
    pub fn blocking(payload: P, timing: Timing) -> Self {
        Self::new(payload, Mode::Blocking, timing)
    }

    /// Borrows the caller-defined content.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Consumes the item and returns its content.
    pub fn into_payload(self) -> P {
        self.payload
    }
}

impl<P> Member for Item<P>
where
    P: Clone + Send + Sync + 'static,
{
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn timing(&self) -> Timing {
        self.timing
    }
}
