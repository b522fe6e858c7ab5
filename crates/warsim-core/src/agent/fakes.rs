//! Fake collaborators shared by the task and scheduler tests.

use std::sync::Mutex;

use super::memory::MemoryHook;
use super::sink::{CommandSink, EventSink};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentKey {
    Number(u32),
    Text { text: String, enter: bool },
    Key(char),
}

#[derive(Debug, Default)]
pub struct FakeKeys {
    sent: Mutex<Vec<SentKey>>,
}

impl FakeKeys {
    pub fn sent(&self) -> Vec<SentKey> {
        self.sent.lock().unwrap().clone()
    }
}

impl CommandSink for FakeKeys {
    fn send_number(&self, n: u32) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentKey::Number(n));
        Ok(())
    }

    fn send_text(&self, text: &str, append_enter: bool) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentKey::Text {
            text: text.to_string(),
            enter: append_enter,
        });
        Ok(())
    }

    fn send_key(&self, ch: char) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(SentKey::Key(ch));
        Ok(())
    }
}

/// Sink whose every call fails, for exercising the fatal-delivery path.
#[derive(Debug, Default)]
pub struct BrokenKeys;

impl CommandSink for BrokenKeys {
    fn send_number(&self, _n: u32) -> anyhow::Result<()> {
        anyhow::bail!("console gone")
    }

    fn send_text(&self, _text: &str, _append_enter: bool) -> anyhow::Result<()> {
        anyhow::bail!("console gone")
    }

    fn send_key(&self, _ch: char) -> anyhow::Result<()> {
        anyhow::bail!("console gone")
    }
}

#[derive(Debug, Default)]
pub struct FakeEvents {
    lines: Mutex<Vec<String>>,
}

impl FakeEvents {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl EventSink for FakeEvents {
    fn emit(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

#[derive(Debug, Default)]
pub struct FakeMemory {
    events: Mutex<Vec<String>>,
    request_save: Mutex<bool>,
}

impl FakeMemory {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn raise_save_request(&self) {
        *self.request_save.lock().unwrap() = true;
    }
}

impl MemoryHook for FakeMemory {
    fn add_event(&self, desc: &str) {
        self.events.lock().unwrap().push(desc.to_string());
    }

    fn take_save_request(&self) -> bool {
        std::mem::take(&mut *self.request_save.lock().unwrap())
    }
}
