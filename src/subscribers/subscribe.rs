//! # Core subscriber trait
//!
//! `Subscribe` is the push-style extension point for reacting to lifecycle events
//! (start an animation, log, record metrics). Each subscriber is driven by a
//! dedicated worker fed by an unbounded queue owned by the
//! [`SubscriberSet`](crate::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they do **not** hold up the scheduler nor other subscribers.
//! - Events arrive in emission order, one at a time.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use phaseq::{Item, LifecycleEvent, Phase, Subscribe};
//!
//! struct Animator;
//!
//! #[async_trait]
//! impl Subscribe<Item<String>> for Animator {
//!     async fn on_event(&self, ev: &LifecycleEvent<Item<String>>) {
//!         if ev.phase == Phase::Entering {
//!             // slide the banner in...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "animator"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::events::LifecycleEvent;
use crate::members::Member;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait Subscribe<M: Member>: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &LifecycleEvent<M>);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
