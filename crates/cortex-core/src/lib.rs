// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod classify;
mod error;
mod language;
mod respond;
mod rules;
mod store;
mod title;

pub use classify::{classify, classify_with_rule};
pub use error::ChatError;
pub use language::detect_language;
pub use respond::{
    code_stats, error_hint, generate_response, summarize, summarize_to, CodeStats, Complexity,
    Reply, Responder, TemplateResponder,
};
pub use rules::{Rule, RuleTable};
pub use store::{ConversationStore, Exchange, Submission};
pub use title::{maybe_infer_title, TitleInferencer, TitleUpdate, STOP_WORDS};
