//! # Worker: the single drain loop.
//!
//! The worker is the only task that touches the queue, the active slot and the
//! blocking suspension. Scheduler handles talk to it through an unbounded command
//! channel; commands are applied between polls of the worker's current wait, so
//! no lock guards the state.
//!
//! ## Phase machine (per member)
//! ```text
//! pop ──► run cancelled? ──yes──► publish Rejected
//!              │no
//!              ▼
//!         publish Entering ──► wait(transition) ──┐
//!                                                 ▼
//!                     Timed:    wait(rest)
//!                     Blocking: wait(suspension)   (no timeout)
//!                                                 ▼
//!         publish Exiting  ──► wait(transition) ──► wait(end_delay) ──► publish Finished
//!
//! any interrupted wait ──► finalize: publish Exiting (if not yet) + Finished
//! ```
//!
//! ## Rules
//! - At most one member is active; the next pop happens only after `Finished`.
//! - Every member that published `Entering` eventually publishes `Finished`.
//! - A member popped from a cancelled run publishes `Rejected` and nothing else.
//! - Interruption during the trailing delay only cuts it short.
//! - Commands already sitting in the channel are absorbed before every pop, so a
//!   hand-off never waits for the next run.

use std::collections::VecDeque;
use std::future::Future;
use std::time::Duration;

use tokio::{
    select,
    sync::{mpsc, oneshot},
    time,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::command::{Command, Status};
use super::config::SchedulerConfig;
use crate::events::{Bus, LifecycleEvent, Phase};
use crate::members::{Member, Mode};

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Waited {
    Elapsed,
    Interrupted,
}

/// Value delivered through the blocking suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    Unblocked,
    Cancelled,
}

/// Occupant of the active slot.
struct Active<M: Member> {
    member: M,
    exited: bool,
}

/// Everything the worker owns besides its inbox.
struct State<M: Member> {
    cfg: SchedulerConfig,
    bus: Bus<M>,
    queue: VecDeque<M>,
    active: Option<Active<M>>,
    /// Token of the current run; cancelled by `CancelAll` and `EnqueueExclusively`.
    run: CancellationToken,
    running: bool,
    suspension: Option<oneshot::Sender<Resume>>,
}

impl<M: Member> State<M> {
    fn apply(&mut self, cmd: Command<M>) {
        match cmd {
            Command::Enqueue(members) => {
                debug!(count = members.len(), "enqueue");
                self.queue.extend(members);
            }
            Command::EnqueueExclusively(member) => {
                debug!(member = ?member.id(), discarded = self.queue.len(), "enqueue exclusively");
                self.abandon();
                self.run = CancellationToken::new();
                self.queue.push_back(member);
            }
            Command::Unblock => self.resume(Resume::Unblocked),
            Command::CancelAll => {
                debug!(discarded = self.queue.len(), "cancel all");
                self.abandon();
            }
            Command::Status(reply) => {
                let _ = reply.send(self.status());
            }
        }
    }

    /// Cancels the run, drops queued members, releases the suspension.
    fn abandon(&mut self) {
        self.run.cancel();
        self.queue.clear();
        self.resume(Resume::Cancelled);
    }

    fn resume(&mut self, how: Resume) {
        match self.suspension.take() {
            Some(tx) => {
                debug!(?how, "resuming blocking member");
                let _ = tx.send(how);
            }
            None => trace!(?how, "no blocking member holding; ignored"),
        }
    }

    fn suspend(&mut self) -> oneshot::Receiver<Resume> {
        let (tx, rx) = oneshot::channel();
        self.suspension = Some(tx);
        rx
    }

    fn begin_run(&mut self) {
        self.run = CancellationToken::new();
        self.running = true;
    }

    fn activate(&mut self, member: M) {
        publish(&self.bus, &member, Phase::Entering);
        self.active = Some(Active {
            member,
            exited: false,
        });
    }

    fn begin_exit(&mut self) {
        if let Some(active) = self.active.as_mut().filter(|a| !a.exited) {
            active.exited = true;
            publish(&self.bus, &active.member, Phase::Exiting);
        }
    }

    /// Publishes the remaining terminal phases and clears the active slot.
    ///
    /// No-op when the slot is already empty.
    fn finalize(&mut self) {
        if let Some(active) = self.active.take() {
            if !active.exited {
                publish(&self.bus, &active.member, Phase::Exiting);
            }
            publish(&self.bus, &active.member, Phase::Finished);
        }
    }

    fn status(&self) -> Status<M::Id> {
        Status {
            active: self.active.as_ref().map(|a| a.member.id()),
            holding: self.suspension.is_some(),
            pending: self.queue.len(),
            running: self.running,
        }
    }
}

fn publish<M: Member>(bus: &Bus<M>, member: &M, phase: Phase) {
    debug!(member = ?member.id(), %phase, "phase");
    bus.publish(LifecycleEvent::new(member.clone(), phase));
}

/// Single background process draining the queue.
pub(crate) struct Worker<M: Member> {
    inbox: mpsc::UnboundedReceiver<Command<M>>,
    inbox_open: bool,
    state: State<M>,
}

impl<M: Member> Worker<M> {
    pub fn new(
        cfg: SchedulerConfig,
        bus: Bus<M>,
        inbox: mpsc::UnboundedReceiver<Command<M>>,
    ) -> Self {
        Self {
            inbox,
            inbox_open: true,
            state: State {
                cfg,
                bus,
                queue: VecDeque::new(),
                active: None,
                run: CancellationToken::new(),
                running: false,
                suspension: None,
            },
        }
    }

    /// Runs until every scheduler handle is dropped.
    ///
    /// While idle the worker only waits for commands; any command that leaves
    /// members in the queue starts a new run.
    pub async fn run(mut self) {
        debug!("worker started");
        while let Some(cmd) = self.inbox.recv().await {
            self.state.apply(cmd);
            self.drain().await;
            if !self.inbox_open {
                break;
            }
        }
        debug!("worker stopped");
    }

    /// One run: pops members in FIFO order until the queue is empty.
    async fn drain(&mut self) {
        if self.state.queue.is_empty() {
            return;
        }
        self.state.begin_run();
        debug!(pending = self.state.queue.len(), "run started");

        loop {
            self.absorb();
            let Some(member) = self.state.queue.pop_front() else {
                break;
            };

            let run = self.state.run.clone();
            if run.is_cancelled() {
                publish(&self.state.bus, &member, Phase::Rejected);
                continue;
            }
            self.present(member, &run).await;
        }

        self.state.running = false;
        debug!("run finished");
    }

    /// Drives one member through its phases.
    async fn present(&mut self, member: M, run: &CancellationToken) {
        let mode = member.mode();
        let timing = member.timing();
        let transition = self.state.cfg.transition_for(&timing);

        self.state.activate(member);
        if self.sleep(transition, run).await == Waited::Interrupted {
            self.state.finalize();
            return;
        }

        let held = match mode {
            Mode::Timed => self.sleep(timing.rest, run).await,
            Mode::Blocking => {
                let resume = self.state.suspend();
                let held = self.hold(resume, run).await;
                self.state.suspension = None;
                held
            }
        };
        if held == Waited::Interrupted {
            self.state.finalize();
            return;
        }

        self.state.begin_exit();
        if self.sleep(transition, run).await == Waited::Interrupted {
            self.state.finalize();
            return;
        }

        // Interrupted or not, the trailing delay ends in `Finished`.
        let _ = self.sleep(timing.end_delay, run).await;
        self.state.finalize();
    }

    async fn sleep(&mut self, d: Duration, run: &CancellationToken) -> Waited {
        self.wait(
            async move {
                time::sleep(d).await;
                Waited::Elapsed
            },
            run,
        )
        .await
    }

    /// Waits on the blocking suspension. No timeout.
    async fn hold(&mut self, resume: oneshot::Receiver<Resume>, run: &CancellationToken) -> Waited {
        self.wait(
            async move {
                match resume.await {
                    Ok(Resume::Unblocked) => Waited::Elapsed,
                    Ok(Resume::Cancelled) | Err(_) => Waited::Interrupted,
                }
            },
            run,
        )
        .await
    }

    /// Waits for `until` while still serving commands.
    ///
    /// Cancellation of `run` wins over everything else.
    async fn wait<F>(&mut self, until: F, run: &CancellationToken) -> Waited
    where
        F: Future<Output = Waited>,
    {
        tokio::pin!(until);
        loop {
            select! {
                biased;

                _ = run.cancelled() => return Waited::Interrupted,
                waited = &mut until => return waited,
                cmd = self.inbox.recv(), if self.inbox_open => self.dispatch(cmd),
            }
        }
    }

    /// Applies every command already queued, without waiting.
    fn absorb(&mut self) {
        while self.inbox_open {
            match self.inbox.try_recv() {
                Ok(cmd) => self.state.apply(cmd),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => self.dispatch(None),
            }
        }
    }

    fn dispatch(&mut self, cmd: Option<Command<M>>) {
        match cmd {
            Some(cmd) => self.state.apply(cmd),
            None => {
                debug!("all scheduler handles dropped; abandoning work");
                self.inbox_open = false;
                self.state.abandon();
            }
        }
    }
}
