//! Approximate name matching
//!
//! Scores are on a 0-100 scale. The weighted scorer picks the best of
//! several views of the two strings:
//!
//! - plain similarity (normalized Indel: insertions and deletions only)
//! - token-sort and token-set similarity, for strings of similar length
//! - best-window (partial) similarity, for strings of very different length
//!
//! Inputs are compared case-insensitively with punctuation and underscores
//! folded to spaces, so `Pseudomonas_aeruginosa` and `pseudomonas aeruginosa`
//! score 100.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

/// Minimum score for an approximate match
pub const DEFAULT_SCORE_CUTOFF: f64 = 50.0;

/// Best candidate found for a query
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub name: String,
    pub score: f64,
}

/// Picks the closest known name to a query
#[derive(Debug, Clone, Copy)]
pub struct ApproximateMatcher {
    score_cutoff: f64,
}

impl Default for ApproximateMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_CUTOFF)
    }
}

impl ApproximateMatcher {
    pub fn new(score_cutoff: f64) -> Self {
        Self { score_cutoff }
    }

    pub fn score_cutoff(&self) -> f64 {
        self.score_cutoff
    }

    /// Highest-scoring candidate at or above the cutoff.
    ///
    /// Ties go to the candidate seen first.
    pub fn best_match<'a, I>(&self, query: &str, candidates: I) -> Option<FuzzyMatch>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let query = preprocess(query);
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(&'a str, f64)> = None;
        for candidate in candidates {
            let score = weighted_ratio_processed(&query, &preprocess(candidate));
            if score < self.score_cutoff {
                continue;
            }
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((candidate, score));
                if score >= 100.0 {
                    break;
                }
            }
        }

        best.map(|(name, score)| FuzzyMatch {
            name: name.to_string(),
            score,
        })
    }
}

/// Weighted similarity of two raw strings, 0-100
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    weighted_ratio_processed(&preprocess(a), &preprocess(b))
}

fn weighted_ratio_processed(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let len_a = a.chars().count() as f64;
    let len_b = b.chars().count() as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    let mut end = ratio(a, b);

    if len_ratio < 1.5 {
        let tokens = token_sort_ratio(a, b).max(token_set_ratio(a, b));
        return end.max(tokens * 0.95);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    end = end.max(partial_ratio(a, b) * partial_scale);
    end.max(partial_token_ratio(a, b) * 0.95 * partial_scale)
}

/// Lowercase, fold everything but letters and digits to spaces, trim
fn preprocess(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .trim()
        .to_string()
}

/// `100 * (1 - indel / (|a| + |b|))`; a substitution costs two edits
fn ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 100.0;
    }
    let distance = indel::distance(a.chars(), b.chars());
    100.0 * (1.0 - distance as f64 / total as f64)
}

fn tokens(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens = tokens(s);
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = tokens(a).into_iter().collect();
    let set_b: BTreeSet<&str> = tokens(b).into_iter().collect();

    let common: Vec<&str> = set_a.intersection(&set_b).copied().collect();
    let only_a: Vec<&str> = set_a.difference(&set_b).copied().collect();
    let only_b: Vec<&str> = set_b.difference(&set_a).copied().collect();

    // one name's tokens are a subset of the other's
    if !common.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let common = common.join(" ");
    let rest_a = only_a.join(" ");
    let rest_b = only_b.join(" ");

    if common.is_empty() {
        return ratio(&rest_a, &rest_b);
    }

    let combined_a = format!("{} {}", common, rest_a);
    let combined_b = format!("{} {}", common, rest_b);

    ratio(&common, &combined_a)
        .max(ratio(&common, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

/// Best similarity of the shorter string against every equally long window of the longer
fn partial_ratio(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let short_chars: Vec<char> = shorter.chars().collect();
    let long_chars: Vec<char> = longer.chars().collect();
    if short_chars.is_empty() {
        return 0.0;
    }
    if short_chars.len() == long_chars.len() {
        return ratio(shorter, longer);
    }

    let mut best = 0.0f64;
    for window in long_chars.windows(short_chars.len()) {
        let window: String = window.iter().collect();
        best = best.max(ratio(shorter, &window));
        if best >= 100.0 {
            break;
        }
    }
    best
}

fn partial_token_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = tokens(a).into_iter().collect();
    let set_b: BTreeSet<&str> = tokens(b).into_iter().collect();

    if set_a.intersection(&set_b).next().is_some() {
        return 100.0;
    }

    partial_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_identical_after_normalization() {
        assert_eq!(weighted_ratio("Pseudomonas_aeruginosa", "pseudomonas aeruginosa"), 100.0);
        assert_eq!(weighted_ratio(" ESCHERICHIA ", "escherichia"), 100.0);
    }

    #[test]
    fn test_empty_scores_zero() {
        assert_eq!(weighted_ratio("", "bacillota"), 0.0);
        assert_eq!(weighted_ratio("___", "bacillota"), 0.0);
    }

    #[test]
    fn test_typo_scores_high() {
        let score = weighted_ratio("pseudomona", "pseudomonas");
        assert!((score - 95.238_095).abs() < 1e-4, "score {}", score);

        let score = weighted_ratio("bacilus", "bacillus");
        assert!((score - 93.333_333).abs() < 1e-4, "score {}", score);
    }

    #[test]
    fn test_substitution_costs_two_edits() {
        // one substitution in six characters
        let score = weighted_ratio("abcdef", "abcxef");
        assert!((score - 83.333_333).abs() < 1e-4, "score {}", score);
    }

    #[test]
    fn test_appended_characters_beat_a_substitution() {
        let found = ApproximateMatcher::default()
            .best_match("abcdef", ["abcxef", "abcdefgh"])
            .unwrap();
        assert_eq!(found.name, "abcdefgh");
        assert!((found.score - 85.714_286).abs() < 1e-4, "score {}", found.score);
    }

    #[test]
    fn test_word_order_is_forgiven() {
        let score = weighted_ratio("aeruginosa pseudomonas", "pseudomonas aeruginosa");
        assert!((score - 95.0).abs() < 1e-9, "score {}", score);
    }

    #[test]
    fn test_substring_of_longer_name() {
        // partial match scaled for the length difference
        let score = weighted_ratio("aeruginosa", "pseudomonas aeruginosa");
        assert!((score - 90.0).abs() < 1e-9, "score {}", score);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        assert!(weighted_ratio("zzzzqqq", "bacillota") < DEFAULT_SCORE_CUTOFF);
    }

    #[test]
    fn test_best_match_picks_highest() {
        let matcher = ApproximateMatcher::default();
        let found = matcher
            .best_match("pseudomona", ["escherichia", "pseudomonas", "pseudonocardia"])
            .unwrap();
        assert_eq!(found.name, "pseudomonas");
    }

    #[test]
    fn test_best_match_tie_goes_to_first_seen() {
        let matcher = ApproximateMatcher::default();
        let found = matcher.best_match("abcd", ["abce", "abcf"]).unwrap();
        assert_eq!(found.name, "abce");
    }

    #[test]
    fn test_best_match_respects_cutoff() {
        assert!(ApproximateMatcher::default()
            .best_match("zzzzqqq", ["bacillota", "pseudomonas"])
            .is_none());
        assert!(ApproximateMatcher::new(99.0)
            .best_match("pseudomona", ["pseudomonas"])
            .is_none());
        assert!(ApproximateMatcher::default()
            .best_match("pseudomonas", std::iter::empty())
            .is_none());
    }

    proptest! {
        #[test]
        fn score_is_bounded_and_symmetric(a in "[a-z_ ]{0,20}", b in "[a-z_ ]{0,20}") {
            let ab = weighted_ratio(&a, &b);
            prop_assert!((0.0..=100.0).contains(&ab));
            prop_assert!((ab - weighted_ratio(&b, &a)).abs() < 1e-9);
        }

        #[test]
        fn self_match_is_perfect(a in "[a-z]{1,20}( [a-z]{1,10})?") {
            prop_assert_eq!(weighted_ratio(&a, &a), 100.0);
        }
    }
}
