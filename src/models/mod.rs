// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CodeRule, EligibilityRules, GenderRule, Scheme, ScoredScheme, ScoringWeights, SearchHit,
    StateRule, UserProfile, INDIAN_STATES,
};
pub use requests::{ChatRequest, RecommendRequest};
pub use responses::{
    ChatResponse, ErrorResponse, HealthResponse, RecommendResponse, SchemeListResponse,
    UserSummary, ValidationErrorResponse,
};
