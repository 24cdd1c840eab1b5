// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::OnceLock;

use cortex_config::{TitleConfig, DEFAULT_PLACEHOLDER_TITLE};
use cortex_model::TitleState;
use regex::Regex;
use tracing::debug;

/// Words that never become title keywords.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by",
    "for", "from", "how", "i", "in", "is", "it", "me", "my",
    "of", "on", "or", "please", "so", "that", "the", "this",
    "to", "we", "what", "when", "where", "which", "who", "why",
    "with", "you", "your", "about", "can", "could", "would", "should",
];

const ELLIPSIS: &str = "...";

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").expect("url pattern"))
}

/// What title inference decided for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleUpdate {
    /// The title is finalized or already user-chosen; leave it alone.
    Unchanged,
    /// Nothing usable in the message (blank once URLs are stripped).  Show
    /// the placeholder and keep the title open for the next message.
    Placeholder,
    /// Use this title and mark it auto-titled.
    Finalized(String),
}

/// Derives a short keyword title from the first qualifying user message.
#[derive(Debug, Clone)]
pub struct TitleInferencer {
    config: TitleConfig,
    placeholder: String,
}

impl Default for TitleInferencer {
    fn default() -> Self {
        Self::new(TitleConfig::default(), DEFAULT_PLACEHOLDER_TITLE)
    }
}

impl TitleInferencer {
    pub fn new(config: TitleConfig, placeholder: impl Into<String>) -> Self {
        Self { config, placeholder: placeholder.into() }
    }

    pub fn placeholder(&self) -> &str { &self.placeholder }

    /// Inference only runs while the title is not finalized and still blank
    /// or the placeholder.
    pub fn is_eligible(&self, state: TitleState, current_title: &str) -> bool {
        if state.is_finalized() {
            return false;
        }
        let current = current_title.trim();
        current.is_empty() || current.eq_ignore_ascii_case(&self.placeholder)
    }

    /// Decide the title for a conversation in `state` titled `current_title`
    /// after the user sent `text`.
    pub fn maybe_infer(&self, state: TitleState, current_title: &str, text: &str) -> TitleUpdate {
        if !self.is_eligible(state, current_title) {
            return TitleUpdate::Unchanged;
        }
        match self.infer(text) {
            Some(title) => {
                debug!(title = %title, "inferred conversation title");
                TitleUpdate::Finalized(title)
            }
            None => TitleUpdate::Placeholder,
        }
    }

    /// Build a title from free text.  `None` when nothing is left after
    /// stripping URLs and whitespace.
    pub fn infer(&self, text: &str) -> Option<String> {
        let without_urls = url_pattern().replace_all(text, " ");
        let normalized = without_urls.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.is_empty() {
            return None;
        }
        let title = self
            .keyword_title(&normalized)
            .or_else(|| self.leading_words_title(&normalized))?;
        Some(self.cap(title))
    }

    /// Up to `max_words` keywords: ASCII-alphanumeric tokens that are long
    /// enough and not stop words, title-cased in original order.
    fn keyword_title(&self, normalized: &str) -> Option<String> {
        let cleaned: String = normalized
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
            .collect();

        let keywords: Vec<String> = cleaned
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|w| w.len() >= self.config.min_token_len && !STOP_WORDS.contains(&w.as_str()))
            .take(self.config.max_words)
            .map(|w| title_case(&w))
            .collect();

        (!keywords.is_empty()).then(|| keywords.join(" "))
    }

    /// Fallback when every token was filtered: the first words of the text,
    /// cut at a question mark.
    fn leading_words_title(&self, normalized: &str) -> Option<String> {
        let head = match normalized.find('?') {
            Some(i) if i > 0 => &normalized[..i],
            _ => normalized,
        };
        let words: Vec<String> = head
            .split_whitespace()
            .take(self.config.max_words)
            .map(|w| title_case(&w.to_lowercase()))
            .collect();
        (!words.is_empty()).then(|| words.join(" "))
    }

    fn cap(&self, title: String) -> String {
        let max = self.config.max_len;
        if title.chars().count() <= max {
            return title;
        }
        if max < ELLIPSIS.len() {
            return title.chars().take(max).collect();
        }
        let head: String = title.chars().take(max - ELLIPSIS.len()).collect();
        format!("{}{ELLIPSIS}", head.trim_end())
    }
}

/// Title inference with the reference settings (`New Chat` placeholder,
/// 4 keywords, 28 characters).  `Some(title)` when the conversation should
/// be renamed and finalized.
pub fn maybe_infer_title(state: TitleState, current_title: &str, text: &str) -> Option<String> {
    match TitleInferencer::default().maybe_infer(state, current_title, text) {
        TitleUpdate::Finalized(title) => Some(title),
        TitleUpdate::Unchanged | TitleUpdate::Placeholder => None,
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(text: &str) -> Option<String> {
        TitleInferencer::default().infer(text)
    }

    // ── Keyword titles ────────────────────────────────────────────────────────

    #[test]
    fn question_becomes_short_keyword_title() {
        let title = maybe_infer_title(TitleState::Unset, "New Chat", "How do I fix a NullPointerException in my loop?")
            .unwrap();
        assert_eq!(title, "Fix Nullpointerexception...");
        assert!(title.chars().count() <= 28);
        assert!(title.contains(' '));
        for word in title.trim_end_matches("...").split(' ') {
            assert!(!STOP_WORDS.contains(&word.to_lowercase().as_str()));
            assert!(word.chars().next().unwrap().is_uppercase());
        }
    }

    #[test]
    fn keeps_first_four_keywords_in_order() {
        assert_eq!(infer("sort vectors using rust closures quickly").as_deref(), Some("Sort Vectors Using Rust"));
    }

    #[test]
    fn short_tokens_and_stop_words_are_dropped() {
        assert_eq!(infer("what is the best way to learn go and rust").as_deref(), Some("Best Way Learn Rust"));
    }

    #[test]
    fn punctuation_splits_tokens() {
        assert_eq!(infer("async/await in tokio-runtime").as_deref(), Some("Async Await Tokio Runtime"));
    }

    #[test]
    fn urls_are_ignored() {
        assert_eq!(infer("see https://example.com/docs?q=1 parser crash").as_deref(), Some("See Parser Crash"));
    }

    #[test]
    fn long_title_is_capped_with_ellipsis() {
        let title = infer("internationalization localization globalization accessibility").unwrap();
        assert_eq!(title.chars().count(), 28);
        assert!(title.ends_with("..."));
        assert!(title.starts_with("Internationalization Loca"));
    }

    #[test]
    fn truncation_trims_trailing_space_before_ellipsis() {
        let inferencer = TitleInferencer::new(TitleConfig { max_len: 10, ..TitleConfig::default() }, "New Chat");
        // First 7 chars are "Parser " -> trimmed to "Parser".
        assert_eq!(inferencer.infer("parser crashes often").as_deref(), Some("Parser..."));
    }

    #[test]
    fn tiny_cap_never_exceeds_max_len() {
        for max_len in 0..=3 {
            let inferencer = TitleInferencer::new(TitleConfig { max_len, ..TitleConfig::default() }, "New Chat");
            let title = inferencer.infer("parser crashes often").unwrap();
            assert!(title.chars().count() <= max_len, "max_len {max_len} gave {title:?}");
        }
    }

    // ── Fallback ──────────────────────────────────────────────────────────────

    #[test]
    fn all_stop_words_fall_back_to_leading_words() {
        assert_eq!(infer("how can i?").as_deref(), Some("How Can I"));
    }

    #[test]
    fn fallback_takes_at_most_four_words() {
        assert_eq!(infer("so it is as it is to be").as_deref(), Some("So It Is As"));
    }

    #[test]
    fn fallback_ignores_leading_question_mark() {
        assert_eq!(infer("? ok").as_deref(), Some("? Ok"));
    }

    #[test]
    fn blank_after_url_removal_yields_none() {
        assert_eq!(infer("   https://example.com   "), None);
        assert_eq!(infer(""), None);
    }

    // ── Eligibility / state machine ───────────────────────────────────────────

    #[test]
    fn finalized_titles_are_left_alone() {
        let inferencer = TitleInferencer::default();
        assert_eq!(inferencer.maybe_infer(TitleState::AutoTitled, "New Chat", "rust macros"), TitleUpdate::Unchanged);
        assert_eq!(inferencer.maybe_infer(TitleState::UserTitled, "", "rust macros"), TitleUpdate::Unchanged);
    }

    #[test]
    fn custom_title_is_not_eligible_even_if_unset() {
        let inferencer = TitleInferencer::default();
        assert_eq!(inferencer.maybe_infer(TitleState::Unset, "Notes", "rust macros"), TitleUpdate::Unchanged);
    }

    #[test]
    fn placeholder_match_is_case_insensitive_and_trimmed() {
        let inferencer = TitleInferencer::default();
        assert!(inferencer.is_eligible(TitleState::Unset, "  new chat "));
        assert!(inferencer.is_eligible(TitleState::Unset, ""));
    }

    #[test]
    fn url_only_message_keeps_placeholder_open() {
        let inferencer = TitleInferencer::default();
        assert_eq!(
            inferencer.maybe_infer(TitleState::Unset, "New Chat", "http://x.y"),
            TitleUpdate::Placeholder
        );
        assert_eq!(maybe_infer_title(TitleState::Unset, "New Chat", "http://x.y"), None);
    }

    #[test]
    fn custom_placeholder_is_respected() {
        let inferencer = TitleInferencer::new(TitleConfig::default(), "Untitled");
        assert!(inferencer.is_eligible(TitleState::Unset, "Untitled"));
        assert!(!inferencer.is_eligible(TitleState::Unset, "New Chat"));
    }
}
