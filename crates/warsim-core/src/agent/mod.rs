//! The task scheduler and its per-task state machines.
//!
//! One `CoreAgent` owns the session context and three tasks in fixed
//! priority order: the one-shot boot flow, the reusable save flow, and the
//! arena fight watcher. Each incoming snapshot is classified once and routed
//! by `CoreAgent::feed`; collaborators (keystroke sink, event lines, memory)
//! stay behind trait boundaries and are passed in per call.

pub mod arena;
pub mod boot;
pub mod context;
pub mod memory;
pub mod save;
pub mod scheduler;
pub mod sink;
pub mod task;

#[cfg(test)]
pub(crate) mod fakes;

pub use context::SessionContext;
pub use memory::MemoryHook;
pub use scheduler::CoreAgent;
pub use sink::{CommandSink, EventSink};
pub use task::{RunState, Snapshot, Task, TaskIo};
