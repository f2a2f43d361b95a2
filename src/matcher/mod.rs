//! Request Matcher: maps free-text requests onto cached reports.
//!
//! Candidate selection is a substring scan of the catalog cache, ranking is a
//! word-overlap count (`scoring`), and parameters come from a fixed trigger
//! table (`rules`). No NLP beyond that.

pub mod rules;
pub mod scoring;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::catalog::{CatalogCache, CatalogError, ReportDescriptor};
use rules::{apply_rules, TriggerRule, DEFAULT_RULES};

// ─── Types ──────────────────────────────────────────────────────────────────

/// The report chosen for a request plus the parameters to run it with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub report: ReportDescriptor,
    pub score: usize,
    pub parameters: BTreeMap<String, String>,
}

/// Errors from matching a request.
#[derive(Debug, Error)]
pub enum MatchError {
    /// No cached report matched the request.
    #[error("no reports found for '{request}'")]
    NoMatchFound { request: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

// ─── RequestMatcher ─────────────────────────────────────────────────────────

/// Matches requests against a borrowed catalog cache.
pub struct RequestMatcher<'a> {
    cache: &'a CatalogCache,
    rules: &'static [TriggerRule],
}

impl<'a> RequestMatcher<'a> {
    pub fn new(cache: &'a CatalogCache) -> Self {
        Self::with_rules(cache, DEFAULT_RULES)
    }

    pub fn with_rules(cache: &'a CatalogCache, rules: &'static [TriggerRule]) -> Self {
        Self { cache, rules }
    }

    /// Choose the best report for `request` and extract its parameters.
    ///
    /// Candidates are the reports containing the whole request text. When
    /// that finds nothing, every report containing any single request word
    /// is considered instead (cache order, no duplicates).
    pub fn match_request(&self, request: &str) -> Result<MatchResult, MatchError> {
        let tokens = scoring::tokenize(request);
        let candidates = self.candidates(request, &tokens)?;
        let candidate_count = candidates.len();

        let (report, score) = scoring::select_best(candidates, &tokens).ok_or_else(|| {
            MatchError::NoMatchFound {
                request: request.to_string(),
            }
        })?;
        let parameters = self.extract_parameters(request);

        tracing::info!(
            report_id = %report.id,
            report_name = %report.name,
            score,
            candidates = candidate_count,
            params = ?parameters,
            "matched request to report"
        );

        Ok(MatchResult {
            report,
            score,
            parameters,
        })
    }

    /// Parameters implied by trigger words in `request`.
    pub fn extract_parameters(&self, request: &str) -> BTreeMap<String, String> {
        apply_rules(self.rules, request)
    }

    fn candidates(
        &self,
        request: &str,
        tokens: &[String],
    ) -> Result<Vec<ReportDescriptor>, MatchError> {
        let direct = self.cache.find(request)?;
        if !direct.is_empty() || tokens.is_empty() {
            return Ok(direct);
        }

        tracing::debug!(request, "no whole-text match, falling back to per-word search");
        let mut merged: Vec<ReportDescriptor> = Vec::new();
        for report in self.cache.all()? {
            let needle_hit = tokens.iter().any(|t| report.contains_lowercase(t));
            if needle_hit {
                merged.push(report);
            }
        }
        Ok(merged)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, name: &str, description: &str) -> ReportDescriptor {
        ReportDescriptor {
            id: id.into(),
            name: name.into(),
            path: "/Team Content".into(),
            description: description.into(),
            parameters: vec![],
            last_modified: String::new(),
        }
    }

    fn sample_cache() -> CatalogCache {
        let mut cache = CatalogCache::open(":memory:").unwrap();
        cache
            .replace_all(&[
                report("r1", "Daily Sales", "sales by region"),
                report("r2", "Monthly Summary", "summary totals"),
            ])
            .unwrap();
        cache
    }

    #[test]
    fn test_daily_sales_request_selects_r1() {
        let cache = sample_cache();
        let result = RequestMatcher::new(&cache)
            .match_request("daily sales report")
            .unwrap();
        assert_eq!(result.report.id, "r1");
        assert_eq!(result.score, 2);
        assert!(result.parameters.is_empty());
    }

    #[test]
    fn test_whole_text_match_is_used_first() {
        let cache = sample_cache();
        let result = RequestMatcher::new(&cache).match_request("Summary").unwrap();
        assert_eq!(result.report.id, "r2");
        assert_eq!(result.score, 1);
    }

    #[test]
    fn test_path_only_match_scores_zero() {
        let cache = sample_cache();
        // Both reports live under "/Team Content"; neither name nor
        // description contains it, so the first one wins on a 0-0 tie.
        let result = RequestMatcher::new(&cache).match_request("team content").unwrap();
        assert_eq!(result.report.id, "r1");
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_match_is_idempotent() {
        let cache = sample_cache();
        let matcher = RequestMatcher::new(&cache);
        let a = matcher.match_request("monthly totals for q4").unwrap();
        let b = matcher.match_request("monthly totals for q4").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.report.id, "r2");
        assert_eq!(a.parameters.get("p_Quarter").map(String::as_str), Some("Q4"));
    }

    #[test]
    fn test_empty_cache_is_not_found() {
        let cache = CatalogCache::open(":memory:").unwrap();
        let matcher = RequestMatcher::new(&cache);
        for request in ["daily sales", "", "q4"] {
            let err = matcher.match_request(request).unwrap_err();
            assert!(matches!(err, MatchError::NoMatchFound { .. }));
        }
    }

    #[test]
    fn test_unrelated_request_is_not_found() {
        let cache = sample_cache();
        let err = RequestMatcher::new(&cache)
            .match_request("inventory levels")
            .unwrap_err();
        assert!(err.to_string().contains("inventory levels"));
    }

    #[test]
    fn test_extract_parameters_dec() {
        let cache = sample_cache();
        let params = RequestMatcher::new(&cache).extract_parameters("Sales for Dec");
        assert_eq!(params.get("p_Date").map(String::as_str), Some("2024-12"));
    }

    #[test]
    fn test_custom_rules() {
        const RULES: &[TriggerRule] = &[TriggerRule {
            triggers: &["emea"],
            key: "p_Region",
            value: "EMEA",
        }];
        let cache = sample_cache();
        let result = RequestMatcher::with_rules(&cache, RULES)
            .match_request("EMEA daily sales")
            .unwrap();
        assert_eq!(result.parameters.len(), 1);
        assert_eq!(result.parameters["p_Region"], "EMEA");
    }
}
