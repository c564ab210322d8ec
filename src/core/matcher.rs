use crate::core::{filters::passes_hard_filters, scoring::ScoringEngine};
use crate::models::{EligibilityRules, Scheme, ScoredScheme, ScoringWeights, UserProfile};

/// Minimum relevance a scheme must reach to appear in results.
pub const MIN_MATCH_SCORE: u8 = 30;

/// Maximum number of results returned per profile.
pub const MAX_RESULTS: usize = 20;

/// Matching orchestrator - runs the hard-filter + soft-score pipeline over
/// the whole catalog.
///
/// # Pipeline stages
/// 1. Hard filters (state, gender, age) - failing schemes are dropped
/// 2. Soft scoring of every surviving scheme
/// 3. Minimum-score cut, ranking and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    scorer: ScoringEngine,
    min_score: u8,
    max_results: usize,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            scorer: ScoringEngine::new(weights),
            min_score: MIN_MATCH_SCORE,
            max_results: MAX_RESULTS,
        }
    }

    pub fn with_default_weights() -> Self {
        Self::new(ScoringWeights::default())
    }

    /// Override the result-set bounds. Used by configuration; the defaults
    /// match the service contract (score >= 30, top 20).
    pub fn with_limits(mut self, min_score: u8, max_results: usize) -> Self {
        self.min_score = min_score;
        self.max_results = max_results;
        self
    }

    /// Find matching schemes for a profile, ranked by relevance.
    ///
    /// The result is sorted non-increasing by `match_score`; ties keep
    /// catalog order. Pure function of its inputs: identical profile and
    /// catalog always yield the identical ordered list.
    pub fn find_matches(&self, profile: &UserProfile, schemes: &[Scheme]) -> Vec<ScoredScheme> {
        let mut matched: Vec<ScoredScheme> = schemes
            .iter()
            .filter(|scheme| passes_hard_filters(profile, &scheme.eligibility))
            .filter_map(|scheme| {
                let score = self.scorer.calculate_score(profile, &scheme.eligibility);
                (score >= self.min_score).then(|| ScoredScheme {
                    scheme: scheme.clone(),
                    match_score: score,
                })
            })
            .collect();

        // Stable sort keeps catalog order for equal scores.
        matched.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        matched.truncate(self.max_results);

        matched
    }

    /// Yes/no eligibility check for a single scheme.
    pub fn passes_hard_filters(&self, profile: &UserProfile, rules: &EligibilityRules) -> bool {
        passes_hard_filters(profile, rules)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EligibilityRules, GenderRule, StateRule};

    fn scheme(id: &str, rules: EligibilityRules) -> Scheme {
        Scheme {
            id: id.to_string(),
            name: format!("Scheme {}", id),
            description: String::new(),
            category: "general".to_string(),
            scheme_type: "central".to_string(),
            benefits: String::new(),
            how_to_apply: String::new(),
            url: String::new(),
            eligibility: rules,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            age: Some(25),
            gender: Some("male".to_string()),
            state: Some("Bihar".to_string()),
            annual_income: Some(150_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_hard_filtered_scheme_never_appears() {
        let matcher = Matcher::with_default_weights();
        let schemes = vec![
            scheme("open", EligibilityRules::default()),
            scheme(
                "women-only",
                EligibilityRules {
                    gender: GenderRule::Only("female".to_string()),
                    ..Default::default()
                },
            ),
        ];

        let results = matcher.find_matches(&profile(), &schemes);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].scheme.id, "open");
    }

    #[test]
    fn test_results_sorted_descending_with_stable_ties() {
        let matcher = Matcher::with_default_weights();
        let schemes = vec![
            // Scores 100 (open state rule satisfied).
            scheme("a", EligibilityRules::default()),
            // Income ceiling missed: 20 of 35 -> 57.
            scheme(
                "b",
                EligibilityRules {
                    max_income: Some(100_000),
                    ..Default::default()
                },
            ),
            // Same rule set as "a": same score, must stay behind it.
            scheme("c", EligibilityRules::default()),
        ];

        let results = matcher.find_matches(&profile(), &schemes);

        let ids: Vec<&str> = results.iter().map(|r| r.scheme.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert!(results.windows(2).all(|w| w[0].match_score >= w[1].match_score));
    }

    #[test]
    fn test_low_scores_are_cut() {
        let matcher = Matcher::with_default_weights();
        // Everything constrained and nothing satisfied except the state rule
        // being missed too: score 0, below the 30 cut.
        let schemes = vec![scheme(
            "strict",
            EligibilityRules {
                states: StateRule::AnyOf(vec!["Kerala".to_string()]),
                ..Default::default()
            },
        )];

        // State hard filter already rejects; also prove the score cut with a
        // scheme that passes filters but scores low.
        assert!(matcher.find_matches(&profile(), &schemes).is_empty());

        let weak = vec![scheme(
            "weak",
            EligibilityRules {
                category: crate::models::CodeRule::AnyOf(vec!["st".to_string()]),
                max_income: Some(1),
                occupation: crate::models::CodeRule::AnyOf(vec!["student".to_string()]),
                is_bpl: Some(true),
                is_farmer: Some(true),
                is_student: Some(true),
                disability: Some(true),
                ..Default::default()
            },
        )];
        // Only the open state rule is satisfied: 20 of 100, cut at 30.
        assert!(matcher.find_matches(&profile(), &weak).is_empty());
    }

    #[test]
    fn test_results_capped_at_twenty() {
        let matcher = Matcher::with_default_weights();
        let schemes: Vec<Scheme> = (0..40)
            .map(|i| scheme(&i.to_string(), EligibilityRules::default()))
            .collect();

        let results = matcher.find_matches(&profile(), &schemes);

        assert_eq!(results.len(), MAX_RESULTS);
    }

    #[test]
    fn test_find_matches_is_idempotent() {
        let matcher = Matcher::with_default_weights();
        let schemes: Vec<Scheme> = (0..30)
            .map(|i| {
                scheme(
                    &i.to_string(),
                    EligibilityRules {
                        max_income: if i % 2 == 0 { Some(100_000) } else { None },
                        ..Default::default()
                    },
                )
            })
            .collect();

        let first = matcher.find_matches(&profile(), &schemes);
        let second = matcher.find_matches(&profile(), &schemes);

        let first_ids: Vec<&str> = first.iter().map(|r| r.scheme.id.as_str()).collect();
        let second_ids: Vec<&str> = second.iter().map(|r| r.scheme.id.as_str()).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn test_empty_catalog_yields_empty_results() {
        let matcher = Matcher::with_default_weights();
        assert!(matcher.find_matches(&profile(), &[]).is_empty());
    }
}
