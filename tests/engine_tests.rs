// Integration tests for the matching and scoring pipeline

use saarthi_algo::core::{Matcher, ScoringEngine, MAX_RESULTS, MIN_MATCH_SCORE};
use saarthi_algo::models::{EligibilityRules, GenderRule, StateRule, UserProfile};
use saarthi_algo::services::Catalog;

const CATALOG: &str = r#"{
    "schemes": [
        {
            "id": "income-support",
            "name": "Income Support Scheme",
            "description": "Direct income support",
            "category": "finance",
            "type": "central",
            "eligibility": {
                "min_age": 18, "max_age": 60, "states": "all",
                "category": ["obc", "sc"], "max_income": 200000
            }
        },
        {
            "id": "women-skill",
            "name": "Women Skill Development",
            "description": "Training for women",
            "category": "women",
            "type": "central",
            "eligibility": {"gender": "female", "states": "all"}
        },
        {
            "id": "odisha-farmer",
            "name": "Odisha Farmer Assistance",
            "description": "State support for cultivators",
            "category": "agriculture",
            "type": "state",
            "eligibility": {"states": ["Odisha"], "occupation": ["farmer"]}
        },
        {
            "id": "open-scheme",
            "name": "Universal Welfare Scheme",
            "description": "No stated restrictions",
            "category": "social",
            "type": "central",
            "eligibility": {"states": "all"}
        },
        {
            "id": "senior-pension",
            "name": "Senior Citizen Pension",
            "description": "Monthly pension for the elderly",
            "category": "pension",
            "type": "central",
            "eligibility": {"min_age": 60, "states": "all"}
        }
    ]
}"#;

fn catalog() -> Catalog {
    Catalog::from_json(CATALOG).unwrap()
}

fn profile() -> UserProfile {
    serde_json::from_str(
        r#"{
            "age": 25,
            "gender": "male",
            "state": "Bihar",
            "category": "obc",
            "annual_income": 150000,
            "occupation": "farmer",
            "is_bpl": false
        }"#,
    )
    .unwrap()
}

#[test]
fn test_worked_example_scores_100() {
    // Four applicable dimensions, all satisfied: age 15 + state 20 +
    // category 15 + income 15 = 65 of 65, scaled to 100.
    let catalog = catalog();
    let rules = &catalog.by_id("income-support").unwrap().eligibility;

    let engine = ScoringEngine::with_default_weights();
    assert_eq!(engine.calculate_score(&profile(), rules), 100);
}

#[test]
fn test_nationwide_schemes_never_state_filtered() {
    let matcher = Matcher::with_default_weights();
    let catalog = catalog();

    for state in ["Bihar", "Kerala", "Ladakh"] {
        let user = UserProfile {
            age: Some(25),
            gender: Some("male".to_string()),
            state: Some(state.to_string()),
            ..Default::default()
        };
        let results = matcher.find_matches(&user, catalog.all_schemes());
        assert!(
            results.iter().any(|r| r.scheme.id == "open-scheme"),
            "open-scheme must survive the state gate for {}",
            state
        );
    }
}

#[test]
fn test_gender_restricted_scheme_is_hard_filtered() {
    let matcher = Matcher::with_default_weights();
    let catalog = catalog();

    let results = matcher.find_matches(&profile(), catalog.all_schemes());
    assert!(
        results.iter().all(|r| r.scheme.id != "women-skill"),
        "a male profile must never see a female-only scheme"
    );

    let mut female = profile();
    female.gender = Some("female".to_string());
    let results = matcher.find_matches(&female, catalog.all_schemes());
    assert!(results.iter().any(|r| r.scheme.id == "women-skill"));
}

#[test]
fn test_age_gate_excludes_pension_scheme() {
    let matcher = Matcher::with_default_weights();
    let catalog = catalog();

    let results = matcher.find_matches(&profile(), catalog.all_schemes());
    assert!(results.iter().all(|r| r.scheme.id != "senior-pension"));
}

#[test]
fn test_result_contract_bounds() {
    let matcher = Matcher::with_default_weights();
    let catalog = catalog();

    let results = matcher.find_matches(&profile(), catalog.all_schemes());

    assert!(results.len() <= MAX_RESULTS);
    assert!(results.iter().all(|r| r.match_score >= MIN_MATCH_SCORE));
    assert!(results.iter().all(|r| r.match_score <= 100));
    assert!(results
        .windows(2)
        .all(|w| w[0].match_score >= w[1].match_score));
}

#[test]
fn test_find_matches_is_deterministic() {
    let matcher = Matcher::with_default_weights();
    let catalog = catalog();

    let first: Vec<(String, u8)> = matcher
        .find_matches(&profile(), catalog.all_schemes())
        .into_iter()
        .map(|r| (r.scheme.id, r.match_score))
        .collect();
    let second: Vec<(String, u8)> = matcher
        .find_matches(&profile(), catalog.all_schemes())
        .into_iter()
        .map(|r| (r.scheme.id, r.match_score))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_malformed_profile_degrades_instead_of_failing() {
    // A non-numeric age coerces to 0 at the boundary; the engine then simply
    // fails age-gated schemes rather than erroring out.
    let garbled: UserProfile = serde_json::from_str(
        r#"{"age": "twenty five", "gender": "male", "state": "Bihar"}"#,
    )
    .unwrap();
    assert_eq!(garbled.age, Some(0));

    let matcher = Matcher::with_default_weights();
    let catalog = catalog();
    let results = matcher.find_matches(&garbled, catalog.all_schemes());

    assert!(results.iter().all(|r| r.scheme.id != "income-support"));
    assert!(results.iter().any(|r| r.scheme.id == "open-scheme"));
}

#[test]
fn test_empty_catalog_returns_empty_results() {
    let matcher = Matcher::with_default_weights();
    let empty = Catalog::empty();

    assert!(matcher.find_matches(&profile(), empty.all_schemes()).is_empty());
}

#[test]
fn test_score_range_over_rule_grid() {
    // Every combination of a small rule grid stays within [0, 100].
    let engine = ScoringEngine::with_default_weights();
    let profiles = [
        UserProfile::default(),
        profile(),
        UserProfile {
            age: Some(70),
            gender: Some("female".to_string()),
            ..Default::default()
        },
    ];
    let rule_sets = [
        EligibilityRules::default(),
        EligibilityRules {
            min_age: Some(18),
            gender: GenderRule::Only("female".to_string()),
            states: StateRule::AnyOf(vec!["Kerala".to_string()]),
            max_income: Some(50_000),
            is_bpl: Some(true),
            ..Default::default()
        },
        EligibilityRules {
            max_age: Some(35),
            is_farmer: Some(true),
            is_student: Some(false),
            ..Default::default()
        },
    ];

    for user in &profiles {
        for rules in &rule_sets {
            let score = engine.calculate_score(user, rules);
            assert!(score <= 100);
        }
    }
}

#[test]
fn test_hard_filter_is_usable_standalone() {
    let matcher = Matcher::with_default_weights();
    let catalog = catalog();

    let rules = &catalog.by_id("odisha-farmer").unwrap().eligibility;
    assert!(!matcher.passes_hard_filters(&profile(), rules));

    let mut odisha_user = profile();
    odisha_user.state = Some("Odisha".to_string());
    assert!(matcher.passes_hard_filters(&odisha_user, rules));
}

#[test]
fn test_scored_scheme_serializes_flat() {
    let matcher = Matcher::with_default_weights();
    let catalog = catalog();

    let results = matcher.find_matches(&profile(), catalog.all_schemes());
    let json = serde_json::to_value(&results[0]).unwrap();

    // The scheme fields and the score sit at the same level, mirroring the
    // wire shape of the recommendation endpoint.
    assert!(json.get("id").is_some());
    assert!(json.get("match_score").is_some());
}
