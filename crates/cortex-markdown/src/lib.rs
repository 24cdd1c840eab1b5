// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod blocks;
mod lines;

pub use blocks::{parse_blocks, FENCE};
pub use lines::{split_lines, LINE_BREAK};
