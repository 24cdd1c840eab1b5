// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Message ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A single chat message.  Fields are private so a message cannot change
/// after it has been appended to a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    sender: Sender,
    content: String,
    timestamp: DateTime<Utc>,
    is_code_block: bool,
}

impl Message {
    pub fn new(sender: Sender, content: impl Into<String>, is_code_block: bool) -> Self {
        Self::at(sender, content, Utc::now(), is_code_block)
    }

    /// Build a message with an explicit timestamp (used by tests and replays).
    pub fn at(
        sender: Sender,
        content: impl Into<String>,
        timestamp: DateTime<Utc>,
        is_code_block: bool,
    ) -> Self {
        Self { sender, content: content.into(), timestamp, is_code_block }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content, false)
    }

    pub fn bot(content: impl Into<String>, is_code_block: bool) -> Self {
        Self::new(Sender::Bot, content, is_code_block)
    }

    pub fn sender(&self) -> Sender { self.sender }

    pub fn content(&self) -> &str { &self.content }

    pub fn timestamp(&self) -> DateTime<Utc> { self.timestamp }

    pub fn is_code_block(&self) -> bool { self.is_code_block }

    pub fn is_user(&self) -> bool { self.sender == Sender::User }
}

// ─── Category ─────────────────────────────────────────────────────────────────

/// Classification bucket for a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Code,
    Error,
    General,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Code => "code",
            Category::Error => "error",
            Category::General => "general",
        };
        f.write_str(s)
    }
}

// ─── LanguageTag ──────────────────────────────────────────────────────────────

/// Source language guessed from a code snippet.  `Text` is the fallback
/// when no signature matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    Java,
    Python,
    Javascript,
    Cpp,
    Text,
}

impl LanguageTag {
    /// Fence label used in generated markdown (```` ```java ````).
    pub fn as_str(self) -> &'static str {
        match self {
            LanguageTag::Java => "java",
            LanguageTag::Python => "python",
            LanguageTag::Javascript => "javascript",
            LanguageTag::Cpp => "cpp",
            LanguageTag::Text => "text",
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
