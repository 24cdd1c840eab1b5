// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod block;
mod conversation;
mod types;

pub use block::{ContentBlock, BULLET_GLYPH};
pub use conversation::{Conversation, TitleState};
pub use types::{Category, LanguageTag, Message, Sender};
