//! Trigger rules for request parameter extraction.
//!
//! A closed, ordered table: each rule fires when any of its trigger
//! substrings occurs in the lower-cased request and sets one parameter to a
//! fixed value. Rules run top to bottom; a later rule for the same key wins.

use std::collections::BTreeMap;

/// One `(triggers → key = value)` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerRule {
    /// Lower-case substrings; any one of them fires the rule.
    pub triggers: &'static [&'static str],
    pub key: &'static str,
    pub value: &'static str,
}

impl TriggerRule {
    pub fn fires(&self, lower_request: &str) -> bool {
        self.triggers.iter().any(|t| lower_request.contains(t))
    }
}

/// Default rule table for Cognos report prompts.
pub const DEFAULT_RULES: &[TriggerRule] = &[
    TriggerRule {
        triggers: &["dec", "2024"],
        key: "p_Date",
        value: "2024-12",
    },
    TriggerRule {
        triggers: &["q4"],
        key: "p_Quarter",
        value: "Q4",
    },
];

/// Apply `rules` to `request` and collect the resulting parameters.
pub fn apply_rules(rules: &[TriggerRule], request: &str) -> BTreeMap<String, String> {
    let lower = request.to_lowercase();
    let mut params = BTreeMap::new();
    for rule in rules.iter().filter(|r| r.fires(&lower)) {
        params.insert(rule.key.to_string(), rule.value.to_string());
    }
    params
}
