// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::OnceLock;

use cortex_model::LanguageTag;
use tracing::debug;

use crate::rules::{Rule, RuleTable};

/// Signatures in priority order.  Several overlap (`import x` is both Java
/// and Python, `=>` can sit in a C++ comment), so order is the tie-break.
fn language_rules() -> &'static RuleTable<LanguageTag> {
    static RULES: OnceLock<RuleTable<LanguageTag>> = OnceLock::new();
    RULES.get_or_init(|| {
        RuleTable::new(
            vec![
                Rule::pattern("java", r"(?i)(public\s+class|System\.out|import\s+java\.)", LanguageTag::Java),
                // `$` without (?m): only a colon at the very end of the snippet.
                Rule::pattern("python", r"(?i)(def\s+\w+\(|print\(|import\s+\w+|:\s*$)", LanguageTag::Python),
                Rule::pattern("javascript", r"(?i)(function\s+\w+|const\s+\w+|let\s+\w+|=>)", LanguageTag::Javascript),
                Rule::pattern("cpp", r"(?i)(#include\s*<|std::|int\s+main\s*\()", LanguageTag::Cpp),
            ],
            LanguageTag::Text,
        )
    })
}

/// Guess the language of a code snippet; `Text` when nothing matches.
pub fn detect_language(code: &str) -> LanguageTag {
    let language = *language_rules().evaluate(code);
    debug!(%language, "detected language");
    language
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
