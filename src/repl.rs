// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use cortex_config::Config;
use cortex_core::{ChatError, ConversationStore};
use cortex_markdown::parse_blocks;
use cortex_model::Message;

use crate::render::{render_blocks, render_status, render_user};

const HELP: &str = "\
Commands:
  /new            start a new conversation
  /list           list conversations (* = active)
  /switch N       switch to conversation N
  /delete N       delete conversation N
  /pin N          pin or unpin conversation N
  /rename TITLE   rename the active conversation
  /search QUERY   list conversations whose title contains QUERY
  /clear          delete every conversation
  /help           show this help
  /quit           exit
Anything else is sent as a message.";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Message(String),
    New,
    List,
    /// Zero-based index into the displayed list.
    Switch(usize),
    Delete(usize),
    Pin(usize),
    Rename(String),
    Search(String),
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command /{0} (try /help)")]
    Unknown(String),
    #[error("usage: /{0}")]
    Usage(&'static str),
    #[error("not a conversation number: {0}")]
    BadIndex(String),
}

/// Lines starting with `/` are commands; everything else is a message.
/// Conversation numbers are 1-based as shown by `/list`.
pub fn parse_input(line: &str) -> Result<Input, CommandError> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Input::Message(line.to_string()));
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };
    match name {
        "new" => Ok(Input::New),
        "list" | "ls" => Ok(Input::List),
        "switch" => index_arg(arg, "switch N").map(Input::Switch),
        "delete" => index_arg(arg, "delete N").map(Input::Delete),
        "pin" => index_arg(arg, "pin N").map(Input::Pin),
        "rename" => Ok(Input::Rename(arg.to_string())),
        "search" => Ok(Input::Search(arg.to_string())),
        "clear" => Ok(Input::Clear),
        "help" | "?" => Ok(Input::Help),
        "quit" | "exit" | "q" => Ok(Input::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn index_arg(arg: &str, usage: &'static str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::BadIndex(arg.to_string())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Front-end state: the store plus presentation settings.  A single task
/// owns the session, so store mutations are naturally serialized.
pub struct Session {
    store: ConversationStore,
    delay: Duration,
    styled: bool,
}

impl Session {
    pub fn new(config: &Config, delay: Duration, styled: bool) -> Self {
        Self { store: ConversationStore::new(config), delay, styled }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Submit `text`, wait out the typing delay, then generate the reply.
    /// The reply goes to the conversation that received the message.
    pub async fn exchange(&mut self, text: &str) -> Result<Option<Message>, ChatError> {
        let submission = self.store.submit_user_message(text)?;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self
            .store
            .generate_reply(&submission.conversation_id, submission.message.content()))
    }

    pub async fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> anyhow::Result<Flow> {
        let input = match parse_input(line) {
            Ok(input) => input,
            Err(e) => {
                write!(out, "{}", render_status(&e.to_string(), self.styled))?;
                return Ok(Flow::Continue);
            }
        };
        debug!(?input, "handling input");

        match input {
            Input::Message(text) => self.send(&text, out).await?,
            Input::New => {
                self.store.create_conversation();
                write!(out, "{}", render_status("Started a new conversation", self.styled))?;
            }
            Input::List => self.list(out, "")?,
            Input::Search(query) => self.list(out, &query)?,
            Input::Switch(index) => {
                if self.store.switch_to_index(index) {
                    self.transcript(out)?;
                } else {
                    self.no_such(out, index)?;
                }
            }
            Input::Delete(index) => {
                if !self.store.delete_at(index) {
                    self.no_such(out, index)?;
                }
            }
            Input::Pin(index) => {
                let toggled = match self.store.id_at(index).map(str::to_string) {
                    Some(id) => self.store.toggle_pin(&id),
                    None => false,
                };
                if !toggled {
                    self.no_such(out, index)?;
                }
            }
            Input::Rename(title) => {
                let id = self.store.active_id().to_string();
                if let Err(e) = self.store.rename(&id, &title) {
                    write!(out, "{}", render_status(&e.to_string(), self.styled))?;
                }
            }
            Input::Clear => {
                self.store.clear();
                write!(out, "{}", render_status("Cleared all conversations", self.styled))?;
            }
            Input::Help => writeln!(out, "{HELP}")?,
            Input::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn send<W: Write>(&mut self, text: &str, out: &mut W) -> anyhow::Result<()> {
        if !self.delay.is_zero() && !text.trim().is_empty() {
            write!(out, "{}", render_status("Assistant is typing...", self.styled))?;
            out.flush()?;
        }
        match self.exchange(text).await {
            Ok(Some(reply)) => {
                let blocks = parse_blocks(reply.content());
                write!(out, "{}", render_blocks(&blocks, self.styled))?;
            }
            Ok(None) => {}
            Err(e) => write!(out, "{}", render_status(&e.to_string(), self.styled))?,
        }
        Ok(())
    }

    fn list<W: Write>(&self, out: &mut W, query: &str) -> anyhow::Result<()> {
        let hits: Vec<&str> = self.store.search(query).iter().map(|c| c.id()).collect();
        for (i, conv) in self.store.conversations().iter().enumerate() {
            if !hits.contains(&conv.id()) {
                continue;
            }
            let marker = if conv.id() == self.store.active_id() { '*' } else { ' ' };
            let pin = if conv.is_pinned() { " [pinned]" } else { "" };
            writeln!(out, "{marker} {:>2}. {}{pin} ({} messages)", i + 1, conv.title(), conv.message_count())?;
        }
        if hits.is_empty() {
            write!(out, "{}", render_status("No matching conversations", self.styled))?;
        }
        Ok(())
    }

    fn transcript<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let conv = self.store.active();
        writeln!(out, "── {} ──", conv.title())?;
        for msg in conv.messages() {
            if msg.is_user() {
                write!(out, "{}", render_user(msg, self.styled))?;
            } else {
                write!(out, "{}", render_blocks(&parse_blocks(msg.content()), self.styled))?;
            }
        }
        Ok(())
    }

    fn no_such<W: Write>(&self, out: &mut W, index: usize) -> anyhow::Result<()> {
        let text = format!("No conversation {}", index + 1);
        write!(out, "{}", render_status(&text, self.styled))?;
        Ok(())
    }
}

/// Read lines from stdin until EOF or `/quit`.
pub async fn run(mut session: Session) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(stdout, "cortex ({} responder). Type /help for commands.", session.store().responder_name())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "you> ")?;
        stdout.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(stdout)?;
            break;
        };
        if session.handle_line(&line, &mut stdout).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
