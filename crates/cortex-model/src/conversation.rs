// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Message;

/// Lifecycle of a conversation title.
///
/// `Unset → AutoTitled → UserTitled`.  Transitions only move forward and
/// `UserTitled` is terminal: no automatic rename may replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleState {
    #[default]
    Unset,
    AutoTitled,
    UserTitled,
}

impl TitleState {
    /// A finalized title is no longer eligible for automatic inference.
    pub fn is_finalized(self) -> bool {
        self != TitleState::Unset
    }
}

/// In-memory conversation: an id, a title and an append-only message log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    id: String,
    title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    title_state: TitleState,
    pinned: bool,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: now,
            updated_at: now,
            title_state: TitleState::Unset,
            pinned: false,
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> &str { &self.id }

    pub fn title(&self) -> &str { &self.title }

    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn title_state(&self) -> TitleState { self.title_state }

    pub fn is_title_finalized(&self) -> bool { self.title_state.is_finalized() }

    pub fn is_pinned(&self) -> bool { self.pinned }

    pub fn messages(&self) -> &[Message] { &self.messages }

    pub fn message_count(&self) -> usize { self.messages.len() }

    pub fn first_message(&self) -> Option<&Message> { self.messages.first() }

    pub fn has_messages(&self) -> bool { !self.messages.is_empty() }

    pub fn push(&mut self, msg: Message) {
        self.messages.push(msg);
        self.touch();
    }

    /// Apply an automatically inferred title.  Ignored once the title is
    /// finalized; returns whether the title changed.
    pub fn set_auto_title(&mut self, title: impl Into<String>) -> bool {
        if self.title_state.is_finalized() {
            return false;
        }
        self.title = title.into();
        self.title_state = TitleState::AutoTitled;
        self.touch();
        true
    }

    /// Apply an explicit user rename.  Always wins and is terminal.
    pub fn set_user_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.title_state = TitleState::UserTitled;
        self.touch();
    }

    /// Show a placeholder while the title is still open.  The state stays
    /// `Unset`, so a later message can still name the conversation.
    pub fn set_placeholder_title(&mut self, title: impl Into<String>) {
        if self.title_state == TitleState::Unset {
            self.title = title.into();
        }
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_has_unique_id() {
        let a = Conversation::new("New Chat");
        let b = Conversation::new("New Chat");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn new_conversation_starts_unset_and_empty() {
        let c = Conversation::new("New Chat");
        assert_eq!(c.title_state(), TitleState::Unset);
        assert!(!c.is_title_finalized());
        assert!(!c.has_messages());
        assert!(c.first_message().is_none());
    }

    #[test]
    fn push_preserves_append_order() {
        let mut c = Conversation::new("New Chat");
        c.push(Message::user("one"));
        c.push(Message::bot("two", false));
        c.push(Message::user("three"));
        let contents: Vec<&str> = c.messages().iter().map(|m| m.content()).collect();
        assert_eq!(contents, ["one", "two", "three"]);
        assert_eq!(c.first_message().map(|m| m.content()), Some("one"));
    }

    #[test]
    fn auto_title_applies_once() {
        let mut c = Conversation::new("New Chat");
        assert!(c.set_auto_title("Rust Lifetimes"));
        assert_eq!(c.title_state(), TitleState::AutoTitled);
        assert!(!c.set_auto_title("Something Else"));
        assert_eq!(c.title(), "Rust Lifetimes");
    }

    #[test]
    fn user_title_is_terminal() {
        let mut c = Conversation::new("New Chat");
        c.set_user_title("Mine");
        assert_eq!(c.title_state(), TitleState::UserTitled);
        assert!(!c.set_auto_title("Inferred"));
        assert_eq!(c.title(), "Mine");
    }

    #[test]
    fn user_title_overrides_auto_title() {
        let mut c = Conversation::new("New Chat");
        c.set_auto_title("Inferred");
        c.set_user_title("Mine");
        assert_eq!(c.title(), "Mine");
        assert_eq!(c.title_state(), TitleState::UserTitled);
    }

    #[test]
    fn placeholder_only_applies_while_unset() {
        let mut c = Conversation::new("");
        c.set_placeholder_title("New Chat");
        assert_eq!(c.title(), "New Chat");
        assert_eq!(c.title_state(), TitleState::Unset);

        c.set_auto_title("Inferred");
        c.set_placeholder_title("New Chat");
        assert_eq!(c.title(), "Inferred");
    }

    #[test]
    fn push_bumps_updated_at() {
        let mut c = Conversation::new("New Chat");
        let before = c.updated_at();
        c.push(Message::user("hi"));
        assert!(c.updated_at() >= before);
    }
}
