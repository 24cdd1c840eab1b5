// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::sync::OnceLock;

use cortex_model::Category;
use tracing::debug;

use crate::rules::{Rule, RuleTable};

fn category_rules() -> &'static RuleTable<Category> {
    static RULES: OnceLock<RuleTable<Category>> = OnceLock::new();
    RULES.get_or_init(|| {
        RuleTable::new(
            vec![
                // Code hints
                Rule::pattern("class declaration", r"class\s+\w+", Category::Code),
                Rule::pattern("main method", r"public\s+static\s+void\s+main", Category::Code),
                Rule::pattern("brace block", r"(?s)\{.*\}", Category::Code),
                Rule::pattern("statement terminator", r";", Category::Code),
                Rule::pattern("def declaration", r"def\s+\w+", Category::Code),
                Rule::pattern("function declaration", r"function\s+\w+", Category::Code),
                Rule::pattern("include directive", r"#include\s*<", Category::Code),
                // Error reports
                Rule::contains_any("error keyword", &["error", "bug", "fail"], Category::Error),
            ],
            Category::General,
        )
    })
}

/// Categorize a trimmed user message.  Total and deterministic; blank input
/// is expected to be rejected by the caller and simply yields `General`.
pub fn classify(text: &str) -> Category {
    classify_with_rule(text).0
}

/// Like [`classify`], also naming the rule that decided (`None` for the
/// fallback).
pub fn classify_with_rule(text: &str) -> (Category, Option<&'static str>) {
    let rules = category_rules();
    let (category, rule) = match rules.first_match(text) {
        Some(rule) => (*rule.result(), Some(rule.name())),
        None => (*rules.fallback(), None),
    };
    debug!(%category, rule = rule.unwrap_or("default"), "classified message");
    (category, rule)
}

// ─── Unit tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_snippet_is_code() {
        let text = "public class Foo { void run() { x = 1; } }";
        assert_eq!(classify(text), Category::Code);
    }

    #[test]
    fn each_code_hint_alone_is_enough() {
        for text in [
            "class Widget",
            "public static void main",
            "if (x) {\n  y\n}",
            "x = 1;",
            "def handler",
            "function go",
            "#include <stdio.h>",
        ] {
            assert_eq!(classify(text), Category::Code, "{text:?}");
        }
    }

    #[test]
    fn code_hint_beats_error_keyword() {
        let (category, rule) = classify_with_rule("error: expected `;`");
        assert_eq!(category, Category::Code);
        assert_eq!(rule, Some("statement terminator"));
    }

    #[test]
    fn error_keywords_are_case_insensitive() {
        assert_eq!(classify("I got an ERROR when running it"), Category::Error);
        assert_eq!(classify("there is a Bug in my loop"), Category::Error);
        assert_eq!(classify("the build FAILED"), Category::Error);
    }

    #[test]
    fn plain_question_is_general() {
        let (category, rule) = classify_with_rule("How do I learn Java?");
        assert_eq!(category, Category::General);
        assert_eq!(rule, None);
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "why does my function fail";
        let first = classify(text);
        for _ in 0..5 {
            assert_eq!(classify(text), first);
        }
    }

    #[test]
    fn blank_text_falls_back_to_general() {
        assert_eq!(classify(""), Category::General);
    }
}
