//! Full-session test through the public surface: fresh boot, the initial
//! save requested by boot, one arena fight, and the readiness gate.

use std::sync::Mutex;

use warsim_core::agent::{CommandSink, CoreAgent, EventSink, MemoryHook, TaskIo};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Sent {
    Number(u32),
    Text(String, bool),
    Key(char),
}

#[derive(Default)]
struct Keys(Mutex<Vec<Sent>>);

impl CommandSink for Keys {
    fn send_number(&self, n: u32) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(Sent::Number(n));
        Ok(())
    }

    fn send_text(&self, text: &str, append_enter: bool) -> anyhow::Result<()> {
        self.0
            .lock()
            .unwrap()
            .push(Sent::Text(text.to_string(), append_enter));
        Ok(())
    }

    fn send_key(&self, ch: char) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(Sent::Key(ch));
        Ok(())
    }
}

#[derive(Default)]
struct Events(Mutex<Vec<String>>);

impl EventSink for Events {
    fn emit(&self, line: &str) {
        self.0.lock().unwrap().push(line.to_string());
    }
}

#[derive(Default)]
struct Memory {
    events: Mutex<Vec<String>>,
    request_save: Mutex<bool>,
}

impl MemoryHook for Memory {
    fn add_event(&self, desc: &str) {
        self.events.lock().unwrap().push(desc.to_string());
    }

    fn take_save_request(&self) -> bool {
        std::mem::take(&mut *self.request_save.lock().unwrap())
    }
}

#[test]
fn fresh_boot_initial_save_and_one_fight() {
    let keys = Keys::default();
    let events = Events::default();
    let memory = Memory::default();
    let io = TaskIo {
        keys: &keys,
        events: &events,
        memory: &memory,
    };

    let mut agent = CoreAgent::new("LLMSave", &events);
    assert!(!agent.ready_for_llm());

    // Boot: no save on disk, so the load menu is exited through the game's
    // own error screen and a quick-start follows.
    let screens = [
        "Welcome to Warsim!\n\n  1) Start a New Game\n  2) Load Game\n  3) Quick-start\n",
        "Savegames\n(none)\n\nPlease enter the name of the save file you wish to load\n",
        "That file does not exist!\nPress any key to continue\n",
        "Welcome to Warsim!\n\n  1) Start a New Game\n  2) Load Game\n  3) Quick-start\n",
        "Born under a dark moon...\nPress any key to continue\n",
        "Your treasury holds 100 gold.\nPress any key to continue\n",
        "The crowning ceremony is ready.\n1) Attend\n2) Skip\n",
        "Old Croll shuffles in.\n1) Listen\n2) Skip\n",
        "Press any key to continue\n",
    ];
    for screen in screens {
        agent.feed(screen, &io).unwrap();
        assert!(!agent.ready_for_llm());
    }

    agent.feed("KINGDOM MENU\n 1) Recruit troops\n", &io).unwrap();
    assert!(agent.ready_for_llm());
    assert!(agent.context().needs_save);
    assert!(!agent.context().loaded_save);
    assert!(agent.context().intro_origin_text().contains("dark moon"));
    assert!(agent.context().intro_conditions_text().contains("100 gold"));

    // The initial save runs off the needs_save flag boot raised.
    agent.feed("KINGDOM MENU\n 1) Recruit troops\n", &io).unwrap();
    agent.feed("Extras\n1) Save Game\n", &io).unwrap();
    agent.feed("Save Name:\n", &io).unwrap();
    agent.feed("Saved.\nPress any key to continue\n", &io).unwrap();
    assert!(!agent.context().needs_save);

    // A fight interrupts free play and gates readiness until it resolves.
    agent.feed("  Knight vs. Bandit\n", &io).unwrap();
    assert!(!agent.ready_for_llm());
    agent.feed("A mighty blow!\nPress any key to continue\n", &io).unwrap();
    assert!(!agent.ready_for_llm());
    agent
        .feed("KINGDOM MENU\nPress any key to continue\n", &io)
        .unwrap();
    assert!(agent.ready_for_llm());

    assert_eq!(
        memory.events.lock().unwrap().clone(),
        vec![
            "Quick-start (no save)",
            "Auto-recruit enabled (New Game)",
            "Game saved: LLMSave",
        ]
    );

    assert_eq!(
        keys.0.lock().unwrap().clone(),
        vec![
            // boot
            Sent::Number(2),
            Sent::Text("x".to_string(), true),
            Sent::Key(' '),
            Sent::Number(3),
            Sent::Key(' '),
            Sent::Key(' '),
            Sent::Number(2),
            Sent::Number(2),
            Sent::Key(' '),
            Sent::Number(1),
            Sent::Number(7),
            Sent::Number(1),
            Sent::Number(0),
            Sent::Number(0),
            // save
            Sent::Number(13),
            Sent::Number(1),
            Sent::Text("LLMSave".to_string(), true),
            Sent::Key(' '),
            Sent::Number(0),
            // arena
            Sent::Key(' '),
            Sent::Key(' '),
            Sent::Key(' '),
        ]
    );
}
