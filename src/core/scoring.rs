use crate::models::{EligibilityRules, GenderRule, ScoringWeights, StateRule, UserProfile};

/// Score returned when a rule set constrains nothing at all: a scheme with no
/// stated restrictions is moderately relevant to everyone.
pub const NEUTRAL_SCORE: u8 = 50;

/// Computes the 0-100 relevance score between a profile and a scheme's
/// eligibility rules.
///
/// Each constrained dimension contributes its weight to a running
/// `total_applicable`; satisfied dimensions contribute the same weight to
/// `score`. There is no negative scoring. The final value is
/// `floor(score / total_applicable * 100)`, clamped to 100.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    weights: ScoringWeights,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Calculate the match score (0-100) between a profile and a rule set.
    pub fn calculate_score(&self, profile: &UserProfile, rules: &EligibilityRules) -> u8 {
        let mut score = 0u32;
        let mut total_applicable = 0u32;

        for (earned, applicable) in [
            self.score_age(profile, rules),
            self.score_gender(profile, rules),
            self.score_state(profile, rules),
            self.score_category(profile, rules),
            self.score_income(profile, rules),
            self.score_occupation(profile, rules),
            self.score_special(profile, rules),
        ] {
            score += earned;
            total_applicable += applicable;
        }

        if total_applicable == 0 {
            return NEUTRAL_SCORE;
        }

        // Integer division floors, matching floor(score / total * 100).
        let percentage = score * 100 / total_applicable;
        percentage.min(100) as u8
    }

    fn score_age(&self, profile: &UserProfile, rules: &EligibilityRules) -> (u32, u32) {
        if rules.min_age.is_none() && rules.max_age.is_none() {
            return (0, 0);
        }

        let age = profile.age_or_default();
        let weight = self.weights.age;
        let above_min = rules.min_age.map_or(true, |min| age >= min);
        let below_max = rules.max_age.map_or(true, |max| age <= max);

        if above_min && below_max {
            (weight, weight)
        } else {
            (0, weight)
        }
    }

    fn score_gender(&self, profile: &UserProfile, rules: &EligibilityRules) -> (u32, u32) {
        let required = match &rules.gender {
            GenderRule::All => return (0, 0),
            GenderRule::Only(gender) => gender,
        };

        let weight = self.weights.gender;
        let user_gender = profile.gender.as_deref().unwrap_or("");

        if user_gender.eq_ignore_ascii_case(required) {
            (weight, weight)
        } else {
            (0, weight)
        }
    }

    // An open state rule counts as a satisfied dimension, so a nationwide
    // scheme still earns the state weight.
    fn score_state(&self, profile: &UserProfile, rules: &EligibilityRules) -> (u32, u32) {
        let weight = self.weights.state;

        match &rules.states {
            StateRule::All => (weight, weight),
            StateRule::AnyOf(states) => {
                let user_state = profile.state.as_deref().unwrap_or("");
                if states.iter().any(|s| s == user_state) {
                    (weight, weight)
                } else {
                    (0, weight)
                }
            }
        }
    }

    fn score_category(&self, profile: &UserProfile, rules: &EligibilityRules) -> (u32, u32) {
        if rules.category.is_unconstrained() {
            return (0, 0);
        }

        let weight = self.weights.category;
        let user_category = profile.category.as_deref().unwrap_or("");

        if rules.category.accepts(user_category) {
            (weight, weight)
        } else {
            (0, weight)
        }
    }

    fn score_income(&self, profile: &UserProfile, rules: &EligibilityRules) -> (u32, u32) {
        let Some(max_income) = rules.max_income else {
            return (0, 0);
        };

        let weight = self.weights.income;

        if profile.income_or_default() <= max_income {
            (weight, weight)
        } else {
            (0, weight)
        }
    }

    fn score_occupation(&self, profile: &UserProfile, rules: &EligibilityRules) -> (u32, u32) {
        if rules.occupation.is_unconstrained() {
            return (0, 0);
        }

        let weight = self.weights.occupation;
        let user_occupation = profile.occupation.as_deref().unwrap_or("");

        if rules.occupation.accepts(user_occupation) {
            (weight, weight)
        } else {
            (0, weight)
        }
    }

    // The four boolean flags form one dimension, with each declared flag
    // contributing an independent sub-weight. A matching value counts as
    // satisfied even when both sides are explicitly false.
    fn score_special(&self, profile: &UserProfile, rules: &EligibilityRules) -> (u32, u32) {
        let weight = self.weights.special;
        let mut score = 0;
        let mut total = 0;

        let checks = [
            (rules.is_bpl, profile.bpl()),
            (rules.is_farmer, profile.farmer()),
            (rules.is_student, profile.student()),
            (rules.disability, profile.disabled()),
        ];

        for (declared, user_value) in checks {
            if let Some(expected) = declared {
                total += weight;
                if user_value == expected {
                    score += weight;
                }
            }
        }

        (score, total)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
