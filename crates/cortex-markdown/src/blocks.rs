// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use cortex_model::ContentBlock;
use tracing::debug;

use crate::split_lines;

/// Opening and closing delimiter of a code block.
pub const FENCE: &str = "```";

/// Scanner state.  The language label lives in the state so an `InCode`
/// value always knows what to tag the block with.
enum State {
    Normal,
    InCode { language: String, code: String },
}

/// Split reply markdown into display blocks, one pass over the lines.
///
/// Recognised line forms, checked in order:
///
/// ```text
/// ```lang        opens a code block (label after the fence, trimmed)
/// ## Heading     → Heading2
/// ### Heading    → Heading3
/// - item         → Bullet
/// (blank)        → Blank
/// anything else  → Paragraph, verbatim
/// ```
///
/// Inside a code block every line is taken verbatim until the next fence
/// line.  Empty code blocks are dropped.  A block still open at the end of
/// the input is flushed rather than lost.  No input makes this fail; text
/// that fits no rule ends up as a paragraph.
pub fn parse_blocks(markdown: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    if markdown.is_empty() {
        return blocks;
    }

    let mut state = State::Normal;

    for line in split_lines(markdown) {
        state = match state {
            State::Normal => {
                if line.starts_with(FENCE) {
                    State::InCode { language: line.replace(FENCE, "").trim().to_string(), code: String::new() }
                } else {
                    blocks.push(classify_line(line));
                    State::Normal
                }
            }
            State::InCode { language, mut code } => {
                if line.starts_with(FENCE) {
                    push_code(&mut blocks, language, &code);
                    State::Normal
                } else {
                    code.push_str(line);
                    code.push('\n');
                    State::InCode { language, code }
                }
            }
        };
    }

    if let State::InCode { language, code } = state {
        debug!(language = %language, "flushing unterminated code block");
        push_code(&mut blocks, language, &code);
    }

    blocks
}

fn classify_line(line: &str) -> ContentBlock {
    if let Some(rest) = line.strip_prefix("## ") {
        ContentBlock::Heading2(rest.trim().to_string())
    } else if let Some(rest) = line.strip_prefix("### ") {
        ContentBlock::Heading3(rest.trim().to_string())
    } else if let Some(rest) = line.strip_prefix("- ") {
        ContentBlock::Bullet(rest.trim().to_string())
    } else if line.trim().is_empty() {
        ContentBlock::Blank
    } else {
        ContentBlock::Paragraph(line.to_string())
    }
}

fn push_code(blocks: &mut Vec<ContentBlock>, language: String, code: &str) {
    let code = code.trim_end();
    if code.trim().is_empty() {
        return;
    }
    blocks.push(ContentBlock::CodeBlock { language, code: code.to_string() });
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
