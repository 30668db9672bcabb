//! # Toasts Example
//!
//! Shows the three ways work leaves the scheduler:
//! - timed toasts that leave on their own
//! - a blocking banner released with `unblock()`
//! - `enqueue_exclusively()` replacing everything pending
//!
//! Every phase change is logged by the built-in `LogWriter`; the example also
//! reads its own `EventStream` to know when to move on.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example toasts --features logging
//! ```

use std::{sync::Arc, time::Duration};

use phaseq::{
    EventStream, Item, LogWriter, Phase, Scheduler, SchedulerConfig, Subscribe, Timing,
};
use tracing_subscriber::EnvFilter;

type Toast = Item<&'static str>;

async fn wait_for(events: &mut EventStream<Toast>, name: &str, phase: Phase) {
    while let Some(ev) = events.recv().await {
        println!("{:>6}[{}] {}", "", ev.member.payload(), ev.phase);
        if *ev.member.payload() == name && ev.phase == phase {
            return;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let scheduler = Scheduler::<Toast>::builder(SchedulerConfig::default())
        .with_subscriber(Arc::new(LogWriter::new()) as Arc<dyn Subscribe<Toast>>)
        .build();
    let mut events = scheduler.subscribe();

    let quick = Timing::new(
        Duration::from_millis(150),
        Duration::from_millis(600),
        Duration::from_millis(50),
    );

    // ============================================================
    // Demo -> Timed: toasts run one after another
    // ============================================================
    println!("Demo 1: Timed toasts");
    println!(" └► Enqueue 3 toasts: they are shown strictly one at a time");
    scheduler.enqueue_all([
        Item::timed("saved", quick),
        Item::timed("synced", quick),
        Item::timed("uploaded", quick),
    ])?;
    wait_for(&mut events, "uploaded", Phase::Finished).await;
    println!();

    // ============================================================
    // Demo -> Blocking: banner waits for unblock()
    // ============================================================
    println!("Demo 2: Blocking banner");
    println!(" └► Banner holds until the connection comes back");
    scheduler.enqueue(Item::blocking("offline", quick))?;
    wait_for(&mut events, "offline", Phase::Entering).await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    println!("{:>6}connection restored", "");
    scheduler.unblock();
    wait_for(&mut events, "offline", Phase::Finished).await;
    println!();

    // ============================================================
    // Demo -> Exclusive: replace everything pending
    // ============================================================
    println!("Demo 3: Exclusive replacement");
    println!(" └► Queue two toasts, then an urgent one replaces them");
    scheduler.enqueue_all([Item::timed("tip-1", quick), Item::timed("tip-2", quick)])?;
    wait_for(&mut events, "tip-1", Phase::Entering).await;
    scheduler.enqueue_exclusively(Item::timed("urgent", quick))?;
    wait_for(&mut events, "urgent", Phase::Finished).await;
    println!();

    // ============================================================
    // Demo -> Cancel: rejected members
    // ============================================================
    println!("Demo 4: Cancel all");
    println!(" └► Cancel while a banner holds; toasts handed off right after are rejected");
    scheduler.enqueue(Item::blocking("maintenance", quick))?;
    wait_for(&mut events, "maintenance", Phase::Entering).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    scheduler.cancel_all();
    scheduler.enqueue(Item::timed("late", quick))?;
    wait_for(&mut events, "late", Phase::Rejected).await;

    let status = scheduler.status().await?;
    println!();
    println!("Status: {status:?}");
    Ok(())
}
