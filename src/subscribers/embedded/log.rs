//! # LogWriter — lifecycle event logger
//!
//! A minimal subscriber that writes incoming [`LifecycleEvent`]s to `tracing`
//! at `INFO` level. Use it for demos or debugging.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! INFO phaseq: [entering] member=ItemId(1) seq=0
//! INFO phaseq: [exiting] member=ItemId(1) seq=1
//! INFO phaseq: [finished] member=ItemId(1) seq=2
//! INFO phaseq: [rejected] member=ItemId(2) seq=3
//! ```

use async_trait::async_trait;
use tracing::info;

use crate::events::LifecycleEvent;
use crate::members::Member;
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<M: Member> Subscribe<M> for LogWriter {
    async fn on_event(&self, e: &LifecycleEvent<M>) {
        info!(target: "phaseq", "[{}] member={:?} seq={}", e.phase, e.member.id(), e.seq);
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
