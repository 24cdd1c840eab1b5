// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::fmt;
use std::sync::OnceLock;

use cortex_config::ResponderConfig;
use cortex_markdown::split_lines;
use cortex_model::{Category, LanguageTag};
use tracing::debug;

use crate::detect_language;
use crate::rules::{Rule, RuleTable};

/// Output of a [`Responder`]: reply markdown plus what was inferred about
/// the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub markdown: String,
    pub is_code_block: bool,
    pub category: Category,
    /// Detected language; only set for `Category::Code`.
    pub language: Option<LanguageTag>,
}

/// Reply generation backend.  `(Category, text) -> markdown`.
///
/// The canned [`TemplateResponder`] is the only implementation; a real model
/// client would slot in here without touching classification or parsing.
pub trait Responder: Send + Sync {
    /// Human-readable backend name for status display.
    fn name(&self) -> &str;

    fn respond(&self, category: Category, text: &str) -> Reply;
}

// ─── Code statistics ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Low,
    Moderate,
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Complexity::Low => "low",
            Complexity::Moderate => "moderate",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeStats {
    pub language: LanguageTag,
    /// Line breaks + 1.  A trailing line break counts as one more line.
    pub line_count: usize,
    pub char_count: usize,
    pub complexity: Complexity,
}

/// Measure a code snippet.  Complexity is `Moderate` once the line count
/// exceeds `complexity_threshold`.
pub fn code_stats(code: &str, complexity_threshold: usize) -> CodeStats {
    let line_count = split_lines(code).count();
    CodeStats {
        language: detect_language(code),
        line_count,
        char_count: code.chars().count(),
        complexity: if line_count > complexity_threshold {
            Complexity::Moderate
        } else {
            Complexity::Low
        },
    }
}

// ─── Summary ──────────────────────────────────────────────────────────────────

const ELLIPSIS: &str = "...";

/// Single-line summary of at most 90 characters.
pub fn summarize(text: &str) -> String {
    summarize_to(text, ResponderConfig::default().summary_limit)
}

/// Collapse whitespace runs to single spaces and trim; if the result is
/// longer than `limit` characters, cut it to `limit - 3` and append `...`.
/// A limit too small for the ellipsis cuts without one.
pub fn summarize_to(text: &str, limit: usize) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.chars().count() <= limit {
        return normalized;
    }
    if limit < ELLIPSIS.len() {
        return normalized.chars().take(limit).collect();
    }
    let mut out: String = normalized.chars().take(limit - ELLIPSIS.len()).collect();
    out.push_str(ELLIPSIS);
    out
}

// ─── Error hints ──────────────────────────────────────────────────────────────

const GENERIC_HINT: &str = "Check the stack trace and locate the exact failing line.";

fn hint_rules() -> &'static RuleTable<&'static str> {
    static RULES: OnceLock<RuleTable<&'static str>> = OnceLock::new();
    RULES.get_or_init(|| {
        RuleTable::new(
            vec![
                Rule::contains_any(
                    "null reference",
                    &["nullpointer"],
                    "A reference is null when it is used. Initialize it or guard the access with a null check.",
                ),
                Rule::contains_any(
                    "index bounds",
                    &["indexoutofbounds"],
                    "An index is outside the collection. Verify sizes and loop boundaries.",
                ),
                Rule::contains_any(
                    "syntax",
                    &["syntax"],
                    "A token is missing or misplaced. Check brackets, semicolons and method signatures.",
                ),
                Rule::contains_any(
                    "missing class",
                    &["classnotfound"],
                    "The class is not on the classpath or the import path is wrong.",
                ),
                Rule::contains_any(
                    "type mismatch",
                    &["type"],
                    "Types do not line up. Check variable assignments and method return types.",
                ),
            ],
            GENERIC_HINT,
        )
    })
}

/// First matching hint for an error report, or the generic stack-trace hint.
pub fn error_hint(text: &str) -> &'static str {
    hint_rules().evaluate(text)
}

// ─── Template responder ───────────────────────────────────────────────────────

/// Canned, offline replies.  Every output is a pure function of the input.
#[derive(Debug, Clone, Default)]
pub struct TemplateResponder {
    config: ResponderConfig,
}

impl TemplateResponder {
    pub fn new(config: ResponderConfig) -> Self {
        Self { config }
    }

    fn code_review(&self, code: &str) -> Reply {
        let stats = code_stats(code, self.config.complexity_threshold);
        debug!(
            language = %stats.language,
            lines = stats.line_count,
            chars = stats.char_count,
            "building code review"
        );
        let markdown = format!(
            "## Code Review Summary
I detected a `{language}` snippet with `{lines}` lines and `{chars}` characters.

### What Looks Good
- There is a concrete structure that solves a real problem
- The logic is split into readable operations
- The implementation is practical

### Improvement Opportunities
- Use clearer variable names for long-term maintainability
- Validate inputs and edge cases (null checks, empty values)
- Keep each function focused on a single responsibility
- Comment non-obvious logic

### Best Practice Pattern
```{language}
// 1) Validate input parameters
// 2) Execute core logic
// 3) Return or display results
// 4) Handle edge cases early
```

### Next Steps
1. Test with normal, boundary, and invalid inputs
2. Expected complexity for maintenance: `{complexity}`
3. Ask me to refactor any specific section
",
            language = stats.language,
            lines = stats.line_count,
            chars = stats.char_count,
            complexity = stats.complexity,
        );
        Reply {
            markdown,
            is_code_block: true,
            category: Category::Code,
            language: Some(stats.language),
        }
    }

    fn error_diagnosis(&self, text: &str) -> Reply {
        let hint = error_hint(text);
        let summary = summarize_to(text, self.config.summary_limit);
        let markdown = format!(
            "## Error Diagnosis & Solution

### First Interpretation
{hint}

### Fast Debugging Checklist
1. **Read the first error**, not only the last one; the root cause is usually there
2. **Check the exact line number** and the 10-20 lines around it
3. **Verify variable types** and method signatures
4. **Reproduce with minimal input** to isolate the issue
5. **Add temporary logging** right before the failing line

### Information to Share for Best Help
- Programming language and framework
- Complete error message (full stack trace)
- The code around the failing line, including imports
- What you expected and what actually happened

### Your Message
```
{summary}
```

### Pro Tip
Every error message says exactly what went wrong. Read it slowly.
"
        );
        Reply { markdown, is_code_block: false, category: Category::Error, language: None }
    }

    fn general_guidance(&self) -> Reply {
        Reply {
            markdown: GENERAL_GUIDANCE.to_string(),
            is_code_block: false,
            category: Category::General,
            language: None,
        }
    }
}

impl Responder for TemplateResponder {
    fn name(&self) -> &str {
        "template"
    }

    fn respond(&self, category: Category, text: &str) -> Reply {
        match category {
            Category::Code => self.code_review(text),
            Category::Error => self.error_diagnosis(text),
            Category::General => self.general_guidance(),
        }
    }
}

/// Reply with the default template settings.  Returns `(markdown, is_code)`.
pub fn generate_response(category: Category, text: &str) -> (String, bool) {
    let reply = TemplateResponder::default().respond(category, text);
    (reply.markdown, reply.is_code_block)
}

const GENERAL_GUIDANCE: &str = "## Welcome to Your AI Coding Assistant

I can help you learn and solve coding challenges. Here is what I do best:

### What I Can Help With
- **Code Review**: Paste code and ask \"What does this do?\" or \"How can I improve this?\"
- **Error Debugging**: Share an error and I will help you understand and fix it
- **Concept Explanation**: Ask about programming concepts in beginner-friendly terms
- **Code Suggestions**: Request patterns, best practices, or refactoring ideas
- **Learning Roadmaps**: Ask \"How do I learn X?\" for structured guidance

### Better Prompts Get Better Help
Instead of: \"How do I code?\"
Try: \"I want to learn Java OOP. Should I start with classes or inheritance?\"

Instead of: \"This doesn't work\"
Try: \"I get IndexOutOfBoundsException on line 25. Here is my code: [...code...]\"

### Tips for Best Results
- Share complete, runnable code examples
- Include the full error message
- Mention your current experience level
- Ask follow-up questions so I can refine the explanation

**What would you like to work on?**
";

// ─── Unit tests ──────────────────────────────────────────────────────────────
