use serde::{Deserialize, Serialize};

/// Shared mutable state for one run of the game, owned by the scheduler and
/// passed by reference into every task. Serializable so the decision-making
/// collaborator can consume it as part of a state blob.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionContext {
    /// Identifier used both to detect an existing save and to name new ones.
    pub save_name: String,
    /// True if boot resumed from a save rather than starting fresh. Fixed
    /// once `BootTask` leaves its initial states; never changes afterward.
    pub loaded_save: bool,
    /// True while the last-seen snapshot matched the kingdom menu. Toggled
    /// on edge transitions only.
    pub in_kingdom_menu: bool,
    /// Save request raised by the memory collaborator (or by boot for the
    /// initial save), consumed by `SaveTask`.
    pub needs_save: bool,
    /// True for the duration of an arena encounter; gates readiness.
    pub in_arena_fight: bool,
    // Narrative captured once during a fresh boot. Opaque at this layer;
    // downstream summarization reads it through the accessors only.
    intro_origin_text: String,
    intro_conditions_text: String,
}

impl SessionContext {
    pub fn new(save_name: impl Into<String>) -> Self {
        Self {
            save_name: save_name.into(),
            loaded_save: false,
            in_kingdom_menu: false,
            needs_save: false,
            in_arena_fight: false,
            intro_origin_text: String::new(),
            intro_conditions_text: String::new(),
        }
    }

    /// Origin narrative from a fresh boot; empty until the capture state has
    /// passed.
    pub fn intro_origin_text(&self) -> &str {
        &self.intro_origin_text
    }

    /// Starting-conditions narrative from a fresh boot; empty until the
    /// capture state has passed.
    pub fn intro_conditions_text(&self) -> &str {
        &self.intro_conditions_text
    }

    pub(crate) fn set_intro_origin_text(&mut self, text: impl Into<String>) {
        self.intro_origin_text = text.into();
    }

    pub(crate) fn set_intro_conditions_text(&mut self, text: impl Into<String>) {
        self.intro_conditions_text = text.into();
    }
}
