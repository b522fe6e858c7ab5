use serde::{Deserialize, Serialize};

use crate::screen::ScreenClass;

use super::context::SessionContext;
use super::memory::MemoryHook;
use super::sink::{CommandSink, EventSink};

/// Coarse task lifecycle. `Waiting` means armed but watching for a trigger
/// (arena); `Active` means mid-flow; `Done` means finished until reset.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Active,
    Waiting,
    Done,
}

/// One snapshot of the game screen, classified exactly once per scheduler
/// cycle and shared by every task that sees it.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub text: &'a str,
    pub class: ScreenClass,
}

/// Collaborator bundle handed to the active task for the duration of one
/// `feed` call. The scheduler owns nothing here; these are the external
/// boundaries.
#[derive(Clone, Copy)]
pub struct TaskIo<'a> {
    pub keys: &'a dyn CommandSink,
    pub events: &'a dyn EventSink,
    pub memory: &'a dyn MemoryHook,
}

/// A named finite-state machine advanced by at most one transition per
/// snapshot.
///
/// `feed` must be a strict no-op (not an error) when the snapshot matches no
/// guard for the current state; external polling may be arbitrarily slow or
/// deliver the same screen many times.
pub trait Task {
    fn name(&self) -> &'static str;

    fn run_state(&self) -> RunState;

    /// Whether this task can be re-armed after completion. One-shot tasks
    /// keep the default.
    fn resettable(&self) -> bool {
        false
    }

    /// Return to the initial sub-state and clear any per-run context flags
    /// this task owns. Must be idempotent. No-op for one-shot tasks.
    fn reset(&mut self, _ctx: &mut SessionContext) {}

    fn feed(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()>;
}
