// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Ordered `(predicate, result)` tables.
//!
//! Classification, language detection and error-hint lookup all share the
//! same shape: test rules top to bottom, the first rule that matches decides,
//! a fallback covers the rest.  Keeping the order in data makes precedence
//! inspectable and testable on its own.

use std::fmt;

use regex::Regex;

type Predicate = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// One entry of a [`RuleTable`].
pub struct Rule<T> {
    name: &'static str,
    predicate: Predicate,
    result: T,
}

impl<T> Rule<T> {
    pub fn new(
        name: &'static str,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
        result: T,
    ) -> Self {
        Self { name, predicate: Box::new(predicate), result }
    }

    /// Rule that matches when `pattern` is found anywhere in the text.
    ///
    /// Panics on an invalid pattern; tables are built from literals.
    pub fn pattern(name: &'static str, pattern: &str, result: T) -> Self {
        let re = Regex::new(pattern).unwrap_or_else(|e| panic!("rule {name}: bad pattern: {e}"));
        Self::new(name, move |text| re.is_match(text), result)
    }

    /// Rule that matches when the lowercased text contains any needle.
    /// Needles must already be lowercase.
    pub fn contains_any(name: &'static str, needles: &'static [&'static str], result: T) -> Self {
        Self::new(
            name,
            move |text| {
                let lower = text.to_lowercase();
                needles.iter().any(|n| lower.contains(n))
            },
            result,
        )
    }

    pub fn name(&self) -> &'static str { self.name }

    pub fn result(&self) -> &T { &self.result }

    pub fn matches(&self, text: &str) -> bool {
        (self.predicate)(text)
    }
}

impl<T: fmt::Debug> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

/// Ordered rule list with a fallback result.  First match wins.
#[derive(Debug)]
pub struct RuleTable<T> {
    rules: Vec<Rule<T>>,
    fallback: T,
}

impl<T> RuleTable<T> {
    pub fn new(rules: Vec<Rule<T>>, fallback: T) -> Self {
        Self { rules, fallback }
    }

    /// The first rule matching `text`, if any.
    pub fn first_match(&self, text: &str) -> Option<&Rule<T>> {
        self.rules.iter().find(|r| r.matches(text))
    }

    /// Result of the first matching rule, or the fallback.
    pub fn evaluate(&self, text: &str) -> &T {
        self.first_match(text).map(Rule::result).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &T { &self.fallback }

    /// Rule names in precedence order.
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(Rule::name).collect()
    }

    pub fn len(&self) -> usize { self.rules.len() }

    pub fn is_empty(&self) -> bool { self.rules.is_empty() }
}

// ─── Unit tests ──────────────────────────────────────────────────────────────
