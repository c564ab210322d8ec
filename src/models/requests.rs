use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{UserProfile, INDIAN_STATES};

/// Request to the recommendation endpoint: the citizen's form profile plus an
/// optional presentation language code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub language: Option<String>,
}

impl RecommendRequest {
    /// Form-level validation. Collects every violation instead of stopping at
    /// the first so the client can show them all at once.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let profile = &self.profile;

        if matches!(profile.age, None | Some(0)) {
            errors.push("Valid age is required".to_string());
        }
        if profile.age_or_default() > 120 {
            errors.push("Age seems invalid".to_string());
        }
        if profile.gender.as_deref().unwrap_or("").is_empty() {
            errors.push("Gender is required".to_string());
        }
        match profile.state.as_deref() {
            None | Some("") => errors.push("State is required".to_string()),
            Some(state) if !INDIAN_STATES.contains(&state) => {
                errors.push("Please select a valid Indian state".to_string());
            }
            Some(_) => {}
        }
        if profile.annual_income.is_none() {
            errors.push("Annual income is required".to_string());
        }

        errors
    }
}

/// Request to the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    #[serde(default = "default_session_id")]
    pub session_id: String,
    #[serde(default)]
    pub language: Option<String>,
}

fn default_session_id() -> String {
    "default".to_string()
}
