// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::cmp::Reverse;

use cortex_config::{ChatConfig, Config};
use cortex_model::{Conversation, Message};
use tracing::{debug, warn};

use crate::{classify_with_rule, ChatError, Responder, TemplateResponder, TitleInferencer, TitleUpdate};

/// A user message accepted into a conversation.
#[derive(Debug, Clone)]
pub struct Submission {
    pub conversation_id: String,
    pub message: Message,
}

/// One user message and the reply generated for it.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub conversation_id: String,
    pub user: Message,
    pub reply: Message,
}

/// In-memory list of conversations plus the active selection.
///
/// The list is ordered for display: pinned conversations first, then the
/// rest newest first.  There is always exactly one active conversation.
/// Every mutation takes `&mut self`, so whoever owns the store is the single
/// writer and appends to one conversation can never interleave.
///
/// Stale ids and indexes are ignored (`false` / `None`) rather than treated
/// as errors, so a front end with outdated selection state stays stable.
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    active: String,
    chat: ChatConfig,
    titles: TitleInferencer,
    responder: Box<dyn Responder>,
}

impl ConversationStore {
    /// Store with the canned template responder.
    pub fn new(config: &Config) -> Self {
        Self::with_responder(config, Box::new(TemplateResponder::new(config.responder.clone())))
    }

    pub fn with_responder(config: &Config, responder: Box<dyn Responder>) -> Self {
        let first = Conversation::new(config.chat.placeholder_title.clone());
        Self {
            active: first.id().to_string(),
            conversations: vec![first],
            chat: config.chat.clone(),
            titles: TitleInferencer::new(config.title.clone(), config.chat.placeholder_title.clone()),
            responder,
        }
    }

    pub fn responder_name(&self) -> &str {
        self.responder.name()
    }

    // ── Lookups ───────────────────────────────────────────────────────────────

    pub fn conversations(&self) -> &[Conversation] { &self.conversations }

    pub fn len(&self) -> usize { self.conversations.len() }

    pub fn is_empty(&self) -> bool { self.conversations.is_empty() }

    pub fn active_id(&self) -> &str { &self.active }

    pub fn active(&self) -> &Conversation {
        // `active` always names a stored conversation.
        self.get(&self.active).unwrap_or(&self.conversations[0])
    }

    pub fn active_index(&self) -> usize {
        self.index_of(&self.active).unwrap_or(0)
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    /// Id of the conversation at display position `index`.
    pub fn id_at(&self, index: usize) -> Option<&str> {
        self.conversations.get(index).map(Conversation::id)
    }

    pub fn titles(&self) -> Vec<&str> {
        self.conversations.iter().map(Conversation::title).collect()
    }

    pub fn message_count(&self, id: &str) -> Option<usize> {
        self.get(id).map(Conversation::message_count)
    }

    pub fn first_message(&self, id: &str) -> Option<&Message> {
        self.get(id).and_then(Conversation::first_message)
    }

    pub fn is_title_finalized(&self, id: &str) -> Option<bool> {
        self.get(id).map(Conversation::is_title_finalized)
    }

    /// Conversations whose title contains `query`, case-insensitively, in
    /// display order.  A blank query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Conversation> {
        let needle = query.trim().to_lowercase();
        self.conversations
            .iter()
            .filter(|c| needle.is_empty() || c.title().to_lowercase().contains(&needle))
            .collect()
    }

    // ── Conversation list ─────────────────────────────────────────────────────

    /// Start a new conversation at the top of the unpinned section and make
    /// it active.  Returns its id.
    pub fn create_conversation(&mut self) -> String {
        let conv = Conversation::new(self.chat.placeholder_title.clone());
        let id = conv.id().to_string();
        let insert_at = self.pinned_count();
        self.conversations.insert(insert_at, conv);
        self.active = id.clone();
        debug!(id = %id, position = insert_at, "created conversation");
        self.enforce_limit();
        id
    }

    pub fn switch_to(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            warn!(id, "switch to unknown conversation ignored");
            return false;
        }
        self.active = id.to_string();
        true
    }

    pub fn switch_to_index(&mut self, index: usize) -> bool {
        match self.id_at(index).map(str::to_string) {
            Some(id) => self.switch_to(&id),
            None => false,
        }
    }

    /// Remove a conversation.  When it was active, the conversation that
    /// moves into its position (or the new last one) becomes active; when it
    /// was the last one, a fresh conversation replaces it.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            warn!(id, "delete of unknown conversation ignored");
            return false;
        };
        self.conversations.remove(index);
        debug!(id, "deleted conversation");

        if self.conversations.is_empty() {
            self.create_conversation();
        } else if self.active == id {
            let next = index.min(self.conversations.len() - 1);
            self.active = self.conversations[next].id().to_string();
        }
        true
    }

    pub fn delete_at(&mut self, index: usize) -> bool {
        match self.id_at(index).map(str::to_string) {
            Some(id) => self.delete(&id),
            None => false,
        }
    }

    /// Flip the pinned flag and regroup: pinned first, relative order kept.
    pub fn toggle_pin(&mut self, id: &str) -> bool {
        let Some(conv) = self.conversations.iter_mut().find(|c| c.id() == id) else {
            return false;
        };
        let pinned = !conv.is_pinned();
        conv.set_pinned(pinned);
        // Stable sort keeps the existing order within each group.
        self.conversations.sort_by_key(|c| !c.is_pinned());
        debug!(id, pinned, "toggled pin");
        true
    }

    /// Explicit user rename.  Final: automatic inference never touches this
    /// conversation's title again.  `Ok(false)` for an unknown id.
    pub fn rename(&mut self, id: &str, title: &str) -> Result<bool, ChatError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ChatError::BlankTitle);
        }
        match self.conversations.iter_mut().find(|c| c.id() == id) {
            Some(conv) => {
                conv.set_user_title(title);
                debug!(id, title, "renamed conversation");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop every conversation and start over with a single fresh one.
    pub fn clear(&mut self) {
        self.conversations.clear();
        self.create_conversation();
    }

    // ── Messages ──────────────────────────────────────────────────────────────

    /// Validate and append a user message to the active conversation,
    /// inferring its title when still open.  Blank input is rejected with
    /// nothing modified.
    pub fn submit_user_message(&mut self, text: &str) -> Result<Submission, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::BlankInput);
        }

        let placeholder = self.titles.placeholder().to_string();
        let update = {
            let conv = self.active();
            self.titles.maybe_infer(conv.title_state(), conv.title(), text)
        };
        let message = Message::user(text);
        let id = self.active.clone();
        let conv = self.active_mut();
        match update {
            TitleUpdate::Finalized(title) => {
                conv.set_auto_title(title);
            }
            TitleUpdate::Placeholder if conv.title().trim().is_empty() => {
                conv.set_placeholder_title(placeholder);
            }
            TitleUpdate::Placeholder | TitleUpdate::Unchanged => {}
        }
        conv.push(message.clone());
        Ok(Submission { conversation_id: id, message })
    }

    /// Generate the reply to `text` and append it to conversation `id`.
    /// `None` when the conversation was deleted in the meantime.
    pub fn generate_reply(&mut self, id: &str, text: &str) -> Option<Message> {
        let index = self.index_of(id)?;
        let message = self.compose_reply(text);
        self.conversations[index].push(message.clone());
        Some(message)
    }

    /// Submit and reply in one step, for callers without a typing delay.
    /// Nothing can intervene between the two steps, so the reply always
    /// lands in the conversation that received the message.
    pub fn send(&mut self, text: &str) -> Result<Exchange, ChatError> {
        let Submission { conversation_id, message } = self.submit_user_message(text)?;
        let reply = self.compose_reply(message.content());
        self.active_mut().push(reply.clone());
        Ok(Exchange { conversation_id, user: message, reply })
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn compose_reply(&self, text: &str) -> Message {
        let text = text.trim();
        let (category, rule) = classify_with_rule(text);
        let reply = self.responder.respond(category, text);
        debug!(
            %category,
            rule = rule.unwrap_or("default"),
            language = reply.language.map(|l| l.as_str()).unwrap_or("-"),
            "generated reply"
        );
        Message::bot(reply.markdown, reply.is_code_block)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.conversations.iter().position(|c| c.id() == id)
    }

    fn active_mut(&mut self) -> &mut Conversation {
        let index = self.active_index();
        &mut self.conversations[index]
    }

    fn pinned_count(&self) -> usize {
        self.conversations.iter().filter(|c| c.is_pinned()).count()
    }

    /// Drop the oldest unpinned, inactive conversations beyond the cap.
    fn enforce_limit(&mut self) {
        let max = self.chat.max_conversations;
        if max == 0 {
            return;
        }
        while self.conversations.len() > max {
            // Display order stops tracking age once pins are toggled, so
            // go by creation time; on a tie the lower entry is older.
            let victim = self
                .conversations
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.is_pinned() && c.id() != self.active)
                .min_by_key(|(index, c)| (c.created_at(), Reverse(*index)))
                .map(|(index, _)| index);
            match victim {
                Some(index) => {
                    let removed = self.conversations.remove(index);
                    debug!(id = removed.id(), "evicted oldest conversation");
                }
                None => break,
            }
        }
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
