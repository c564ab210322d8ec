use crate::models::{EligibilityRules, GenderRule, StateRule, UserProfile};

/// Hard eligibility gate: a scheme failing any of these checks is excluded
/// from the candidate set entirely and never scored.
///
/// Checks run in order: state membership, gender equality, age range. Each
/// check is skipped when the rule leaves the dimension open. Usable on its
/// own for a yes/no eligibility answer.
#[inline]
pub fn passes_hard_filters(profile: &UserProfile, rules: &EligibilityRules) -> bool {
    // 1. State filter. Canonical state names compare exactly.
    if let StateRule::AnyOf(states) = &rules.states {
        let user_state = profile.state.as_deref().unwrap_or("");
        if !states.iter().any(|s| s == user_state) {
            return false;
        }
    }

    // 2. Gender filter.
    if let GenderRule::Only(required) = &rules.gender {
        let user_gender = profile.gender.as_deref().unwrap_or("");
        if !user_gender.eq_ignore_ascii_case(required) {
            return false;
        }
    }

    // 3. Age range filter. A missing age coerces to 0.
    let age = profile.age_or_default();
    if let Some(min_age) = rules.min_age {
        if age < min_age {
            return false;
        }
    }
    if let Some(max_age) = rules.max_age {
        if age > max_age {
            return false;
        }
    }

    true
}
