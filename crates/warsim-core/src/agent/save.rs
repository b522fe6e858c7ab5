use super::context::SessionContext;
use super::task::{RunState, Snapshot, Task, TaskIo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveState {
    Wait,
    Extras,
    Name,
    Confirm,
}

/// Reusable in-game save flow, triggered whenever the memory collaborator
/// requests one. Only starts from the kingdom menu; the request stays
/// pending until the menu is live again.
#[derive(Debug)]
pub struct SaveTask {
    state: SaveState,
    run_state: RunState,
}

impl SaveTask {
    pub fn new() -> Self {
        Self {
            state: SaveState::Wait,
            run_state: RunState::Active,
        }
    }
}

impl Default for SaveTask {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for SaveTask {
    fn name(&self) -> &'static str {
        "Save"
    }

    fn run_state(&self) -> RunState {
        self.run_state
    }

    fn resettable(&self) -> bool {
        true
    }

    fn reset(&mut self, _ctx: &mut SessionContext) {
        // `needs_save` stays as-is: it is the trigger for the next run.
        self.state = SaveState::Wait;
        self.run_state = RunState::Active;
    }

    fn feed(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        // Pick up a freshly raised request even mid-cycle.
        if io.memory.take_save_request() {
            ctx.needs_save = true;
        }
        if self.run_state == RunState::Done {
            return Ok(());
        }

        match self.state {
            SaveState::Wait => {
                if ctx.needs_save && ctx.in_kingdom_menu {
                    io.events.emit("TASK: Save: initiating save sequence");
                    io.keys.send_number(13)?; // Extras menu
                    self.state = SaveState::Extras;
                }
            }
            SaveState::Extras => {
                if snap.text.contains("Save Game") {
                    io.keys.send_number(1)?;
                    self.state = SaveState::Name;
                }
            }
            SaveState::Name => {
                if snap.text.contains("Save Name") {
                    io.keys.send_text(&ctx.save_name, true)?;
                    self.state = SaveState::Confirm;
                }
            }
            SaveState::Confirm => {
                if snap.class.press_any_key {
                    io.keys.send_key(' ')?;
                    io.keys.send_number(0)?; // exit menu
                    io.memory
                        .add_event(&format!("Game saved: {}", ctx.save_name));
                    ctx.needs_save = false;
                    self.run_state = RunState::Done;
                    io.events.emit("TASK: Save: sequence complete");
                }
            }
        }
        Ok(())
    }
}
