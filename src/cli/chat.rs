//! Chat commands.

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};

use crate::chat::ChatRouter;
use crate::facade::Capabilities;

/// Interactive chat session.
#[derive(Parser)]
pub struct ChatCommand {}

impl ChatCommand {
    /// Executes the chat command.
    pub async fn execute(self, capabilities: Capabilities) -> Result<()> {
        capabilities.bring_up().await;
        eprintln!(
            "Music catalog: {}",
            capabilities.music().handle().await.describe()
        );
        eprintln!(
            "Text generation: {}",
            capabilities.text().handle().await.describe()
        );
        eprintln!("Enter to send, Ctrl+D to exit.\n");

        let router = ChatRouter::new(capabilities);
        chat_loop(&router).await
    }
}

/// Answers a single utterance.
#[derive(Parser)]
pub struct AskCommand {
    /// What to ask, e.g. "What's trending?".
    #[arg(required = true, num_args = 1..)]
    pub utterance: Vec<String>,
}

impl AskCommand {
    /// Executes the ask command.
    pub async fn execute(self, capabilities: Capabilities) -> Result<()> {
        let router = ChatRouter::new(capabilities);
        let reply = router.respond(&self.utterance.join(" ")).await;
        println!("{reply}");
        Ok(())
    }
}

async fn chat_loop(router: &ChatRouter) -> Result<()> {
    while let Some(line) = read_utterance()? {
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }
        let reply = router.respond(utterance).await;
        println!("{reply}\n");
    }

    eprintln!("\nGoodbye!");
    Ok(())
}

/// What a single key press does to the line being typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKey {
    Submit,
    EndSession,
    Insert(char),
    Erase,
    Ignore,
}

/// Maps a key press to its line edit. Ctrl+D only ends the session on an
/// empty line.
fn line_key(key: KeyEvent, line_is_empty: bool) -> LineKey {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => LineKey::Submit,
        KeyCode::Char('c') if ctrl => LineKey::EndSession,
        KeyCode::Char('d') if ctrl && line_is_empty => LineKey::EndSession,
        KeyCode::Char('d') if ctrl => LineKey::Submit,
        KeyCode::Char(_) if ctrl => LineKey::Ignore,
        KeyCode::Char(c) => LineKey::Insert(c),
        KeyCode::Backspace => LineKey::Erase,
        _ => LineKey::Ignore,
    }
}

/// Restores cooked mode when the line is done.
struct RawLine;

impl RawLine {
    fn start() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawLine {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Reads one utterance after a "> " prompt.
///
/// Returns `None` when the user ends the session.
fn read_utterance() -> Result<Option<String>> {
    let mut stderr = io::stderr();
    write!(stderr, "> ")?;
    stderr.flush()?;

    let _raw = RawLine::start()?;
    let mut line = String::new();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match line_key(key, line.is_empty()) {
            LineKey::Submit => {
                write!(stderr, "\r\n")?;
                stderr.flush()?;
                return Ok(Some(line));
            }
            LineKey::EndSession => return Ok(None),
            LineKey::Insert(c) => {
                line.push(c);
                write!(stderr, "{c}")?;
            }
            LineKey::Erase => {
                if line.pop().is_some() {
                    write!(stderr, "\x08 \x08")?;
                }
            }
            LineKey::Ignore => {}
        }
        stderr.flush()?;
    }
}
