//! # Queueable members.
//!
//! - [`Member`] the capability set the scheduler is generic over
//! - [`Mode`], [`Timing`] the behavioral tag and timing values a member exposes
//! - [`Item`] payload-backed member with auto-assigned [`ItemId`]

mod item;
mod member;

pub use item::{Item, ItemId};
pub use member::{Member, Mode, Timing};
