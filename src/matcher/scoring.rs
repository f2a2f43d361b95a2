//! Word-overlap scoring of candidate reports.

use crate::catalog::ReportDescriptor;

/// Lower-case a request and split it on whitespace.
pub fn tokenize(request: &str) -> Vec<String> {
    request
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of request tokens that occur as substrings of the report's
/// name + description. Repeated tokens count each time.
pub fn score(report: &ReportDescriptor, tokens: &[String]) -> usize {
    let haystack = report.scoring_text();
    tokens.iter().filter(|t| haystack.contains(t.as_str())).count()
}

/// Pick the highest-scoring candidate. Ties go to the earliest candidate.
pub fn select_best(
    candidates: Vec<ReportDescriptor>,
    tokens: &[String],
) -> Option<(ReportDescriptor, usize)> {
    let mut best: Option<(ReportDescriptor, usize)> = None;
    for candidate in candidates {
        let s = score(&candidate, tokens);
        match &best {
            Some((_, best_score)) if s <= *best_score => {}
            _ => best = Some((candidate, s)),
        }
    }
    best
}
