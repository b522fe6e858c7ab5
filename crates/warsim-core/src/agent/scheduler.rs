use super::arena::ArenaTask;
use super::boot::BootTask;
use super::context::SessionContext;
use super::save::SaveTask;
use super::sink::EventSink;
use super::task::{RunState, Snapshot, Task, TaskIo};
use crate::screen::ScreenPatterns;

/// Owns the session context and the task list in fixed priority order
/// [boot, save, arena], and routes each incoming snapshot.
///
/// Dispatch rules: boot has absolute priority while active. Once boot is
/// done, the save task observes the snapshot without consuming it, so the
/// arena watcher sees the same snapshot in the same cycle. That asymmetry
/// is deliberate: saving is a background concern layered under the
/// foreground menu flow, and must not blind the fight detector.
pub struct CoreAgent {
    ctx: SessionContext,
    patterns: ScreenPatterns,
    boot: BootTask,
    save: SaveTask,
    arena: ArenaTask,
}

impl CoreAgent {
    pub fn new(save_name: impl Into<String>, events: &dyn EventSink) -> Self {
        let agent = Self {
            ctx: SessionContext::new(save_name),
            patterns: ScreenPatterns::new(),
            boot: BootTask::new(events),
            save: SaveTask::new(),
            arena: ArenaTask::new(),
        };
        events.emit("AGENT: core agent initialized");
        agent
    }

    /// Process one snapshot to completion: edge tracking, re-arming, and a
    /// single dispatch round. Errors are fatal sink failures; after one, the
    /// game's menu position is unknown and the session needs a restart.
    pub fn feed(&mut self, snapshot: &str, io: &TaskIo<'_>) -> anyhow::Result<()> {
        let snap = Snapshot {
            text: snapshot,
            class: self.patterns.classify(snapshot),
        };

        // Kingdom-menu tracking is edge-triggered to curb log spam; the
        // toggle always happens, the line is muted during a fight (the
        // fight-end screens flash the menu marker).
        if snap.class.kingdom_menu != self.ctx.in_kingdom_menu {
            self.ctx.in_kingdom_menu = snap.class.kingdom_menu;
            if !self.ctx.in_arena_fight {
                io.events.emit(if self.ctx.in_kingdom_menu {
                    "AGENT: entered kingdom menu"
                } else {
                    "AGENT: exited kingdom menu"
                });
            }
        }

        if io.memory.take_save_request() {
            self.ctx.needs_save = true;
        }

        if self.save.resettable() && self.save.run_state() == RunState::Done && self.ctx.needs_save
        {
            self.save.reset(&mut self.ctx);
            io.events
                .emit(&format!("TASK: {}: re-armed for new request", self.save.name()));
        }
        // The arena watcher is always eligible for the next fight.
        if self.arena.resettable() && self.arena.run_state() == RunState::Done {
            self.arena.reset(&mut self.ctx);
        }

        if self.boot.run_state() == RunState::Active {
            return self.boot.feed(&snap, &mut self.ctx, io);
        }
        if self.save.run_state() == RunState::Active && self.ctx.needs_save {
            self.save.feed(&snap, &mut self.ctx, io)?;
        }
        if matches!(self.arena.run_state(), RunState::Waiting | RunState::Active) {
            self.arena.feed(&snap, &mut self.ctx, io)?;
        }
        Ok(())
    }

    /// True once boot has finished and no arena fight is running. The sole
    /// gate for the decision-making collaborator upstream; re-evaluated on
    /// every call.
    pub fn ready_for_llm(&self) -> bool {
        self.boot.run_state() == RunState::Done && !self.ctx.in_arena_fight
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }
}
