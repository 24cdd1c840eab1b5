// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Title shown for a conversation that has not been named yet.
pub const DEFAULT_PLACEHOLDER_TITLE: &str = "New Chat";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub title: TitleConfig,
    #[serde(default)]
    pub responder: ResponderConfig,
}

/// Shortest usable length for limits that may end in a `...` ellipsis.
pub const MIN_TRUNCATED_LEN: usize = 3;

impl Config {
    /// Reject values that deserialize fine but cannot work.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.title.max_len < MIN_TRUNCATED_LEN {
            anyhow::bail!("title.max_len must be at least {MIN_TRUNCATED_LEN}, got {}", self.title.max_len);
        }
        if self.title.max_words == 0 {
            anyhow::bail!("title.max_words must be at least 1");
        }
        if self.responder.summary_limit < MIN_TRUNCATED_LEN {
            anyhow::bail!(
                "responder.summary_limit must be at least {MIN_TRUNCATED_LEN}, got {}",
                self.responder.summary_limit
            );
        }
        Ok(())
    }
}

// ── Chat ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Title given to freshly created conversations.  Title inference only
    /// runs while a conversation still carries this title (or a blank one).
    pub placeholder_title: String,
    /// Upper bound on conversations kept in memory.  When exceeded, the
    /// oldest unpinned conversation that is not active is dropped.
    /// `0` disables the cap.
    pub max_conversations: usize,
    /// Cosmetic pause before a generated reply is shown, in milliseconds.
    /// Only the front end honours this; reply generation itself is instant.
    pub typing_delay_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            placeholder_title: DEFAULT_PLACEHOLDER_TITLE.into(),
            max_conversations: 100,
            typing_delay_ms: 900,
        }
    }
}

impl ChatConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }
}

// ── Title inference ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Maximum title length in characters, including a trailing `...`.
    pub max_len: usize,
    /// Maximum number of keywords joined into a title.
    pub max_words: usize,
    /// Tokens shorter than this are never used as keywords.
    pub min_token_len: usize,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self { max_len: 28, max_words: 4, min_token_len: 3 }
    }
}

// ── Responder ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    /// Code snippets with more lines than this are reported as "moderate"
    /// maintenance complexity instead of "low".
    pub complexity_threshold: usize,
    /// Maximum length of the inline summary quoted back in error replies.
    pub summary_limit: usize,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self { complexity_threshold: 25, summary_limit: 90 }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
