// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Terminal rendering of parsed reply blocks.
//!
//! Styling goes through crossterm's `Stylize`; with `styled == false` the
//! same layout is produced as plain text (pipes, tests, `NO_COLOR`).
use crossterm::style::Stylize;

use cortex_model::{ContentBlock, Message, BULLET_GLYPH};

/// Badge shown on a code block whose fence carried no language label.
pub const DEFAULT_CODE_BADGE: &str = "Code";

pub fn code_badge(language: &str) -> &str {
    let language = language.trim();
    if language.is_empty() {
        DEFAULT_CODE_BADGE
    } else {
        language
    }
}

/// Render blocks in order, one output line per source line.
pub fn render_blocks(blocks: &[ContentBlock], styled: bool) -> String {
    let mut out = String::new();
    for block in blocks {
        render_block(&mut out, block, styled);
    }
    out
}

fn render_block(out: &mut String, block: &ContentBlock, styled: bool) {
    match block {
        ContentBlock::Heading2(text) => {
            if styled {
                out.push_str(&format!("{}\n", text.as_str().bold().underlined()));
            } else {
                out.push_str(&format!("{text}\n"));
            }
        }
        ContentBlock::Heading3(text) => {
            if styled {
                out.push_str(&format!("{}\n", text.as_str().bold()));
            } else {
                out.push_str(&format!("{text}\n"));
            }
        }
        ContentBlock::Bullet(text) => out.push_str(&format!("  {BULLET_GLYPH} {text}\n")),
        ContentBlock::Paragraph(text) => out.push_str(&format!("{text}\n")),
        ContentBlock::Blank => out.push('\n'),
        ContentBlock::CodeBlock { language, code } => {
            let badge = code_badge(language);
            if styled {
                out.push_str(&format!("{}\n", format!("┌─ {badge}").dark_grey()));
                for line in code.lines() {
                    out.push_str(&format!("{} {}\n", "│".dark_grey(), line.cyan()));
                }
                out.push_str(&format!("{}\n", "└─".dark_grey()));
            } else {
                out.push_str(&format!("┌─ {badge}\n"));
                for line in code.lines() {
                    out.push_str(&format!("│ {line}\n"));
                }
                out.push_str("└─\n");
            }
        }
    }
}

/// A user message as echoed in a transcript.
pub fn render_user(message: &Message, styled: bool) -> String {
    let mut out = String::new();
    for line in message.content().lines() {
        if styled {
            out.push_str(&format!("{} {}\n", ">".green().bold(), line));
        } else {
            out.push_str(&format!("> {line}\n"));
        }
    }
    out
}

/// Transient status or validation notice.
pub fn render_status(text: &str, styled: bool) -> String {
    if styled {
        format!("{}\n", text.yellow())
    } else {
        format!("! {text}\n")
    }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
