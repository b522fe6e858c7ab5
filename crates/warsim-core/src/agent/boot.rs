use super::context::SessionContext;
use super::sink::EventSink;
use super::task::{RunState, Snapshot, Task, TaskIo};

/// Boot flow sub-states. Every variant has a handler; unmatched snapshots
/// leave the machine where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootState {
    Start,
    LoadMenu,
    HandleLoadExitError,
    WaitMainMenuAfterError,
    Origin,
    CaptureConditions,
    SkipCeremony,
    SkipCroll,
    SkipWait,
    Ready,
    CheckAutorecruit,
}

/// One-shot task that drives the game from the main menu to a live kingdom
/// menu with auto-recruit enabled, loading an existing save when one matches
/// the configured name.
///
/// The no-save path deliberately exits the load prompt with `x`, which makes
/// the game surface a "file does not exist" error screen. That error screen
/// is the detection channel for "no save present"; both branches then share
/// the same path back through the main menu.
#[derive(Debug)]
pub struct BootTask {
    state: BootState,
    run_state: RunState,
}

impl BootTask {
    pub fn new(events: &dyn EventSink) -> Self {
        events.emit("TASK: Boot: starting boot sequence");
        Self {
            state: BootState::Start,
            run_state: RunState::Active,
        }
    }

    fn on_start(&mut self, snap: &Snapshot<'_>, io: &TaskIo<'_>) -> anyhow::Result<()> {
        if snap.class.main_menu {
            io.keys.send_number(2)?; // Load Game
            self.state = BootState::LoadMenu;
        }
        Ok(())
    }

    fn on_load_menu(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        if !snap.class.load_menu {
            return Ok(());
        }
        if snap.text.to_lowercase().contains(&ctx.save_name.to_lowercase()) {
            io.events
                .emit(&format!("TASK: Boot: found save '{}', loading", ctx.save_name));
            io.keys.send_text(&ctx.save_name, true)?;
            ctx.loaded_save = true;
            self.state = BootState::Ready; // skip the new-game flow
        } else {
            io.events.emit(&format!(
                "TASK: Boot: save '{}' not found, starting quick-start",
                ctx.save_name
            ));
            io.keys.send_text("x", true)?; // exit load prompt, triggers the error screen
            ctx.loaded_save = false;
            self.state = BootState::HandleLoadExitError;
        }
        Ok(())
    }

    fn on_handle_load_exit_error(
        &mut self,
        snap: &Snapshot<'_>,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        if snap.class.press_any_key {
            io.keys.send_key(' ')?;
            self.state = BootState::WaitMainMenuAfterError;
        }
        Ok(())
    }

    fn on_wait_main_menu_after_error(
        &mut self,
        snap: &Snapshot<'_>,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        if snap.class.main_menu {
            io.keys.send_number(3)?; // Quick-start
            io.memory.add_event("Quick-start (no save)");
            self.state = BootState::Origin;
        }
        Ok(())
    }

    fn on_origin(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        if snap.class.press_any_key {
            io.events.emit("TASK: Boot [new]: capturing origin narrative");
            ctx.set_intro_origin_text(snap.text);
            io.keys.send_key(' ')?;
            self.state = BootState::CaptureConditions;
        }
        Ok(())
    }

    fn on_capture_conditions(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        if snap.class.press_any_key {
            io.events
                .emit("TASK: Boot [new]: capturing conditions narrative");
            ctx.set_intro_conditions_text(snap.text);
            io.keys.send_key(' ')?;
            self.state = BootState::SkipCeremony;
        }
        Ok(())
    }

    fn on_skip_ceremony(&mut self, snap: &Snapshot<'_>, io: &TaskIo<'_>) -> anyhow::Result<()> {
        if snap.text.to_lowercase().contains("crowning ceremony") {
            io.keys.send_number(2)?;
            self.state = BootState::SkipCroll;
        }
        Ok(())
    }

    fn on_skip_croll(&mut self, snap: &Snapshot<'_>, io: &TaskIo<'_>) -> anyhow::Result<()> {
        if snap.text.to_lowercase().contains("old croll") {
            io.keys.send_number(2)?;
            self.state = BootState::SkipWait;
        }
        Ok(())
    }

    fn on_skip_wait(&mut self, snap: &Snapshot<'_>, io: &TaskIo<'_>) -> anyhow::Result<()> {
        if snap.class.press_any_key {
            io.keys.send_key(' ')?;
            self.state = BootState::Ready;
        }
        Ok(())
    }

    fn on_ready(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        if !snap.class.kingdom_menu {
            return Ok(());
        }
        if !ctx.loaded_save {
            self.enable_autorecruit_new_game(ctx, io)
        } else {
            io.events.emit("TASK: Boot [load]: checking auto-recruit status");
            io.keys.send_number(1)?; // recruit menu
            io.keys.send_number(7)?; // auto-recruit submenu
            self.state = BootState::CheckAutorecruit;
            Ok(())
        }
    }

    fn enable_autorecruit_new_game(
        &mut self,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        io.events.emit("TASK: Boot [new]: enabling auto-recruit");
        for n in [1, 7, 1, 0, 0] {
            io.keys.send_number(n)?;
        }
        io.memory.add_event("Auto-recruit enabled (New Game)");
        ctx.in_kingdom_menu = true;
        // A fresh game has nothing on disk yet; request the initial save now.
        ctx.needs_save = true;
        io.events.emit("TASK: Boot [new]: requesting initial save");
        self.run_state = RunState::Done;
        io.events.emit("TASK: Boot [new]: auto-recruit enabled, boot complete");
        Ok(())
    }

    /// Auto-recruit verification for loaded saves. Fires on the next
    /// snapshot regardless of what it shows: an unknown screen here is
    /// logged and assumed fine, because stalling boot forever is worse than
    /// a possibly redundant assumption.
    fn on_check_autorecruit(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        if snap.class.autorecruit_setup {
            io.events.emit("TASK: Boot [load]: auto-recruit is off, enabling");
            for n in [1, 0, 0] {
                io.keys.send_number(n)?; // automate, exit, exit
            }
            io.memory.add_event("Auto-recruit enabled (Loaded Game)");
        } else if snap.class.autorecruit_already_on {
            io.events.emit("TASK: Boot [load]: auto-recruit already on");
            for n in [0, 0] {
                io.keys.send_number(n)?; // fine, exit
            }
            io.memory.add_event("Auto-recruit verified ON (Loaded Game)");
        } else {
            io.events
                .emit("WARN: Boot [load]: unknown auto-recruit screen, assuming enabled");
        }
        ctx.in_kingdom_menu = true;
        self.run_state = RunState::Done;
        io.events.emit("TASK: Boot [load]: boot complete");
        Ok(())
    }
}

impl Task for BootTask {
    fn name(&self) -> &'static str {
        "Boot"
    }

    fn run_state(&self) -> RunState {
        self.run_state
    }

    fn feed(
        &mut self,
        snap: &Snapshot<'_>,
        ctx: &mut SessionContext,
        io: &TaskIo<'_>,
    ) -> anyhow::Result<()> {
        if self.run_state == RunState::Done {
            return Ok(());
        }
        match self.state {
            BootState::Start => self.on_start(snap, io),
            BootState::LoadMenu => self.on_load_menu(snap, ctx, io),
            BootState::HandleLoadExitError => self.on_handle_load_exit_error(snap, io),
            BootState::WaitMainMenuAfterError => self.on_wait_main_menu_after_error(snap, io),
            BootState::Origin => self.on_origin(snap, ctx, io),
            BootState::CaptureConditions => self.on_capture_conditions(snap, ctx, io),
            BootState::SkipCeremony => self.on_skip_ceremony(snap, io),
            BootState::SkipCroll => self.on_skip_croll(snap, io),
            BootState::SkipWait => self.on_skip_wait(snap, io),
            BootState::Ready => self.on_ready(snap, ctx, io),
            BootState::CheckAutorecruit => self.on_check_autorecruit(snap, ctx, io),
        }
    }
}
