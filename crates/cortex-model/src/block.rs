// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

/// Glyph that replaces the `- ` list marker when a bullet is displayed.
pub const BULLET_GLYPH: char = '\u{2022}';

/// One semantic unit of rendered reply output.
///
/// Produced by the markdown block parser in source line order; the rendering
/// surface maps each variant to its own widget or styled line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ContentBlock {
    /// `## ` heading, marker stripped and trimmed.
    Heading2(String),
    /// `### ` heading, marker stripped and trimmed.
    Heading3(String),
    /// `- ` list item; holds the item text without the marker.
    Bullet(String),
    /// Any other non-blank line, verbatim.
    Paragraph(String),
    /// Fenced code.  `language` is the label after the opening fence and may
    /// be empty.
    CodeBlock { language: String, code: String },
    /// Vertical spacer for a blank source line.
    Blank,
}

impl ContentBlock {
    pub fn code(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self::CodeBlock { language: language.into(), code: code.into() }
    }

    /// Text as a plain-text surface would show it.  Bullets gain the glyph,
    /// code blocks return the code body, blanks return an empty string.
    pub fn display_text(&self) -> String {
        match self {
            Self::Heading2(t) | Self::Heading3(t) | Self::Paragraph(t) => t.clone(),
            Self::Bullet(t) => format!("{BULLET_GLYPH} {t}"),
            Self::CodeBlock { code, .. } => code.clone(),
            Self::Blank => String::new(),
        }
    }

    /// Code body for the "copy" affordance; `None` for non-code blocks.
    pub fn copyable_code(&self) -> Option<&str> {
        match self {
            Self::CodeBlock { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Self::CodeBlock { .. })
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
