// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::OnceLock;

use regex::Regex;

/// Every sequence treated as a line break: `\r\n` as one break, then LF, VT,
/// FF, CR, NEL, LS and PS on their own.
pub const LINE_BREAK: &str = r"\r\n|[\n\x0B\x0C\r\x{85}\x{2028}\x{2029}]";

fn line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(LINE_BREAK).expect("line break pattern"))
}

/// Split text into lines.  Always yields `breaks + 1` items, so a trailing
/// break produces a final empty line and empty input a single empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    line_break().split(text)
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
