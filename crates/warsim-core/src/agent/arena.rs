use super::context::SessionContext;
use super::task::{RunState, Snapshot, Task, TaskIo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArenaState {
    WaitingForFight,
    Fighting,
    FightOver,
}

/// Interrupt-style watcher for arena combat. A fight can begin at any point
/// during free play; while one is running, every prompt is auto-dismissed
/// and downstream readiness is gated off through `in_arena_fight`.
#[derive(Debug)]
pub struct ArenaTask {
    state: ArenaState,
    run_state: RunState,
}

impl ArenaTask {
    pub fn new() -> Self {
        Self {
            state: ArenaState::WaitingForFight,
            run_state: RunState::Waiting,
        }
    }
}

impl Default for ArenaTask {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for ArenaTask {
    fn name(&self) -> &'static str {
        "Arena"
    }

    fn run_state(&self) -> RunState {
        self.run_state
    }

    fn resettable(&self) -> bool {
        true
    }

    fn reset(&mut self, ctx: &mut SessionContext) {
        self.state = ArenaState::WaitingForFight;
        self.run_state = RunState::Waiting;
        ctx.in_arena_fight = false;
    }

    fn feed(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        match self.state {
            ArenaState::WaitingForFight => {
                // First-line-only match; see ScreenClass::arena_fight_start.
                if snap.class.arena_fight_start {
                    io.events.emit("TASK: Arena: fight detected, auto-advancing");
                    ctx.in_arena_fight = true;
                    io.keys.send_key(' ')?;
                    self.state = ArenaState::Fighting;
                    self.run_state = RunState::Active;
                }
            }
            ArenaState::Fighting => {
                if snap.class.press_any_key && snap.class.kingdom_menu {
                    // Back at the kingdom menu with a final prompt: fight over.
                    io.keys.send_key(' ')?;
                    ctx.in_arena_fight = false;
                    self.state = ArenaState::FightOver;
                    self.run_state = RunState::Done;
                    io.events.emit("TASK: Arena: fight over");
                } else if snap.class.press_any_key {
                    io.keys.send_key(' ')?;
                } else if snap.class.kingdom_menu {
                    // Menu without the end-of-fight prompt: we missed the
                    // closing screen somewhere. Force-complete.
                    io.events
                        .emit("WARN: Arena: kingdom menu without end-of-fight prompt, closing fight");
                    ctx.in_arena_fight = false;
                    self.state = ArenaState::FightOver;
                    self.run_state = RunState::Done;
                }
            }
            ArenaState::FightOver => {}
        }
        Ok(())
    }
}
