use serde::{Deserialize, Serialize};

use crate::models::domain::{Scheme, ScoredScheme};

/// Response for the recommendation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub success: bool,
    pub total_matches: usize,
    pub schemes: Vec<ScoredScheme>,
    pub user_summary: UserSummary,
}

/// Echo of the profile fields the recommendation was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub state: Option<String>,
    pub age: Option<u32>,
    pub category: Option<String>,
    pub language: String,
}

/// Response for the chat endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
}

/// Response for scheme listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeListResponse {
    pub total: usize,
    pub schemes: Vec<Scheme>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub total_schemes: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Validation failure response carrying every violated rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub error: String,
    pub details: Vec<String>,
    pub status_code: u16,
}
