//! Screen classification for Warsim console snapshots.
//!
//! Every recognizer answers one question: "does this snapshot look like
//! screen X?". The predicates are independent and may co-occur (the kingdom
//! menu frequently carries a press-any-key footer). Classification is pure
//! and total: any input, including empty or garbage text, yields a result.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Classification result for one snapshot. Plain bools so tasks can guard on
/// any combination without re-scanning the text.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ScreenClass {
    pub main_menu: bool,
    pub load_menu: bool,
    pub press_any_key: bool,
    pub kingdom_menu: bool,
    pub autorecruit_setup: bool,
    pub autorecruit_already_on: bool,
    /// Matched against the first line only. Fight summaries repeat the
    /// "X vs. Y" header deeper in long buffers and must not re-trigger.
    pub arena_fight_start: bool,
}

/// Compiled recognizer set. Built once and shared by every task; holds no
/// per-snapshot state.
#[derive(Debug)]
pub struct ScreenPatterns {
    main_menu: Regex,
    load_menu: Regex,
    press_any_key: Regex,
    kingdom_menu: Regex,
    autorecruit_setup: Regex,
    autorecruit_already_on: Regex,
    arena_fight_start: Regex,
}

impl ScreenPatterns {
    pub fn new() -> Self {
        Self {
            main_menu: Regex::new(r"(?s)Welcome to Warsim.*?1\) Start a New Game").unwrap(),
            load_menu: Regex::new(r"(?is)Savegames.*enter the name of the save file").unwrap(),
            press_any_key: Regex::new(r"(?i)Press any key to continue").unwrap(),
            kingdom_menu: Regex::new(r"(?i)KINGDOM MENU").unwrap(),
            autorecruit_setup: Regex::new(r"(?i)automate the automation for me!").unwrap(),
            autorecruit_already_on: Regex::new(r"(?i)already recruiting automatically").unwrap(),
            // Two indented tokens separated by "vs.", e.g. "  Knight vs. Bandit".
            arena_fight_start: Regex::new(r"(?i)^\s+\S+\s+vs\.\s+\S+").unwrap(),
        }
    }

    pub fn classify(&self, text: &str) -> ScreenClass {
        let first_line = text.lines().next().unwrap_or("");
        ScreenClass {
            main_menu: self.main_menu.is_match(text),
            load_menu: self.load_menu.is_match(text),
            press_any_key: self.press_any_key.is_match(text),
            kingdom_menu: self.kingdom_menu.is_match(text),
            autorecruit_setup: self.autorecruit_setup.is_match(text),
            autorecruit_already_on: self.autorecruit_already_on.is_match(text),
            arena_fight_start: self.arena_fight_start.is_match(first_line),
        }
    }
}

impl Default for ScreenPatterns {
    fn default() -> Self {
        Self::new()
    }
}
