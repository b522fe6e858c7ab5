use std::sync::Mutex as StdMutex;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::Mutex;

use warsim_core::agent::{CommandSink, CoreAgent, EventSink, MemoryHook, TaskIo};

mod config_loader;
use config_loader::ConfigLoader;

// On-disk config shape; every field has a default so a missing file and a
// partial file both work.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    control: ControlSection,
    #[serde(default)]
    bot: BotSection,
}

#[derive(Debug, Deserialize)]
struct ControlSection {
    #[serde(default = "default_control_addr")]
    addr: String,
}

impl Default for ControlSection {
    fn default() -> Self {
        Self {
            addr: default_control_addr(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct BotSection {
    #[serde(default = "default_save_name")]
    save_name: String,
    #[serde(default = "default_poll_ms")]
    poll_ms: u64,
    #[serde(default = "default_settle_ms")]
    settle_ms: u64,
    #[serde(default = "default_save_every_events")]
    save_every_events: usize,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            save_name: default_save_name(),
            poll_ms: default_poll_ms(),
            settle_ms: default_settle_ms(),
            save_every_events: default_save_every_events(),
        }
    }
}

fn default_control_addr() -> String {
    "127.0.0.1:7878".to_string()
}

fn default_save_name() -> String {
    "LLMSave".to_string()
}

fn default_poll_ms() -> u64 {
    250
}

fn default_settle_ms() -> u64 {
    100
}

fn default_save_every_events() -> usize {
    60
}

#[derive(Debug, Clone)]
struct RunnerConfig {
    control_addr: String,
    save_name: String,
    poll: Duration,
    settle: Duration,
    save_every_events: usize,
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn load_config() -> anyhow::Result<RunnerConfig> {
    let file: FileConfig = ConfigLoader::parse_from_file("warsim.toml")?.unwrap_or_default();
    Ok(RunnerConfig {
        control_addr: env_override("WARSIM_BOT_CONTROL_ADDR").unwrap_or(file.control.addr),
        save_name: env_override("WARSIM_BOT_SAVE_NAME").unwrap_or(file.bot.save_name),
        poll: Duration::from_millis(
            env_override("WARSIM_BOT_POLL_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(file.bot.poll_ms),
        ),
        settle: Duration::from_millis(
            env_override("WARSIM_BOT_SETTLE_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(file.bot.settle_ms),
        ),
        save_every_events: env_override("WARSIM_BOT_SAVE_EVERY_EVENTS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(file.bot.save_every_events),
    })
}

struct ControlConn {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

/// JSON-lines client to the console gateway's control port. The gateway owns
/// the actual screen capture and keystroke delivery; this side only speaks
/// the request/response protocol.
struct RemoteConsole {
    conn: Mutex<ControlConn>,
}

impl RemoteConsole {
    async fn connect(addr: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("connect control port {addr}"))?;
        let (read, write) = stream.into_split();
        Ok(Self {
            conn: Mutex::new(ControlConn {
                reader: BufReader::new(read),
                writer: write,
            }),
        })
    }

    async fn request_json(&self, req: Value) -> anyhow::Result<Value> {
        let line = format!("{req}\n");
        let mut conn = self.conn.lock().await;
        conn.writer
            .write_all(line.as_bytes())
            .await
            .context("control write")?;
        conn.writer.flush().await.ok();

        let mut resp_line = String::new();
        let n = conn
            .reader
            .read_line(&mut resp_line)
            .await
            .context("control read")?;
        if n == 0 {
            anyhow::bail!("control connection closed");
        }
        let v: Value =
            serde_json::from_str(resp_line.trim()).context("invalid control json response")?;
        if v.get("ok").and_then(Value::as_bool) != Some(true) {
            anyhow::bail!("control request failed: {v}");
        }
        Ok(v)
    }

    async fn snapshot(&self) -> anyhow::Result<String> {
        let v = self.request_json(json!({ "op": "snapshot" })).await?;
        v.get("snapshot")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("missing snapshot in response"))
    }
}

fn number_wire(n: u32) -> Value {
    json!({ "op": "send_number", "value": n })
}

fn text_wire(text: &str, append_enter: bool) -> Value {
    json!({ "op": "send_text", "text": text, "append_enter": append_enter })
}

fn key_wire(ch: char) -> Value {
    json!({ "op": "send_key", "key": ch.to_string() })
}

/// `CommandSink` over the control port. Each call blocks the synchronous
/// agent until the gateway acknowledges delivery and the settle delay has
/// elapsed. The game drops bursts, so the pacing lives here and nowhere
/// else.
struct PacedSink<'a> {
    console: &'a RemoteConsole,
    handle: tokio::runtime::Handle,
    settle: Duration,
}

impl PacedSink<'_> {
    fn deliver(&self, wire: Value) -> anyhow::Result<()> {
        self.handle.block_on(async {
            self.console.request_json(wire).await?;
            tokio::time::sleep(self.settle).await;
            Ok(())
        })
    }
}

impl CommandSink for PacedSink<'_> {
    fn send_number(&self, n: u32) -> anyhow::Result<()> {
        self.deliver(number_wire(n))
    }

    fn send_text(&self, text: &str, append_enter: bool) -> anyhow::Result<()> {
        self.deliver(text_wire(text, append_enter))
    }

    fn send_key(&self, ch: char) -> anyhow::Result<()> {
        self.deliver(key_wire(ch))
    }
}

struct StdoutEvents;

impl EventSink for StdoutEvents {
    fn emit(&self, line: &str) {
        println!("{line}");
    }
}

/// Stand-in for the external memory/persistence collaborator: keeps event
/// descriptions in process and raises a save request every
/// `save_every_events` recorded events. Durable storage and summarization
/// belong to the real collaborator.
struct ChannelMemory {
    save_every_events: usize,
    events: StdMutex<Vec<String>>,
    request_save: StdMutex<bool>,
}

impl ChannelMemory {
    fn new(save_every_events: usize) -> Self {
        Self {
            save_every_events,
            events: StdMutex::new(Vec::new()),
            request_save: StdMutex::new(false),
        }
    }
}

impl MemoryHook for ChannelMemory {
    fn add_event(&self, desc: &str) {
        let mut events = self.events.lock().unwrap();
        events.push(desc.to_string());
        println!("MEMORY: {desc}");
        if self.save_every_events > 0 && events.len() % self.save_every_events == 0 {
            *self.request_save.lock().unwrap() = true;
        }
    }

    fn take_save_request(&self) -> bool {
        std::mem::take(&mut *self.request_save.lock().unwrap())
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = load_config()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;

    println!("AGENT: connecting to console gateway at {}", cfg.control_addr);
    let console = runtime.block_on(RemoteConsole::connect(&cfg.control_addr))?;

    let events = StdoutEvents;
    let memory = ChannelMemory::new(cfg.save_every_events);
    let keys = PacedSink {
        console: &console,
        handle: runtime.handle().clone(),
        settle: cfg.settle,
    };
    let io = TaskIo {
        keys: &keys,
        events: &events,
        memory: &memory,
    };

    let mut agent = CoreAgent::new(cfg.save_name.clone(), &events);
    let mut last_ready = agent.ready_for_llm();

    // The agent is synchronous: one snapshot in, zero or more paced
    // keystrokes out, fully settled before the next poll.
    loop {
        runtime.block_on(tokio::time::sleep(cfg.poll));
        let snapshot = runtime.block_on(console.snapshot())?;

        if let Err(err) = agent.feed(&snapshot, &io) {
            // A failed delivery mid-sequence leaves the game in an unknown
            // menu position; there is no safe resume from here.
            eprintln!("AGENT: fatal: {err:#}");
            return Err(err);
        }

        let ready = agent.ready_for_llm();
        if ready != last_ready {
            println!(
                "AGENT: {}",
                if ready {
                    "ready for decision-making"
                } else {
                    "input gated (boot or fight in progress)"
                }
            );
            last_ready = ready;
        }
    }
}
