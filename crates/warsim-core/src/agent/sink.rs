//! Outbound boundaries: keystroke delivery and the event line channel.
//!
//! The core decides *what* to send and in *which order*; delivery mechanics
//! live behind these traits. Implementations use interior mutability so the
//! traits can be shared as plain `&dyn` references.

/// Delivers synthesized keystrokes to the game.
///
/// Contract: each call blocks until the keystroke(s) are delivered and a
/// fixed settle delay has elapsed. The game has no input queue of its own,
/// so the sink owns that pacing; the core never duplicates it. A failure is
/// fatal to the caller of `feed`: after a partial delivery the game may sit
/// in an unknown menu position, and there is no safe retry from here.
pub trait CommandSink: Send + Sync {
    /// Send a numeric menu choice followed by Enter.
    fn send_number(&self, n: u32) -> anyhow::Result<()>;
    /// Send free-form text, optionally followed by Enter.
    fn send_text(&self, text: &str, append_enter: bool) -> anyhow::Result<()>;
    /// Send a single key (space dismisses most prompts).
    fn send_key(&self, ch: char) -> anyhow::Result<()>;
}

/// Append-only channel of human-readable progress lines (`TASK: ...`,
/// `AGENT: ...`, `WARN: ...`). Best-effort: an implementation may drop lines
/// but must never block the core.
pub trait EventSink: Send + Sync {
    fn emit(&self, line: &str);
}
