use actix_web::{web, HttpResponse, Responder};

use crate::models::{RecommendRequest, RecommendResponse, UserSummary, ValidationErrorResponse};
use crate::routes::AppState;

/// Configure recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/recommend", web::post().to(recommend));
}

/// Recommendation endpoint
///
/// POST /api/recommend
///
/// Receives a citizen profile and returns the ranked list of matching
/// schemes. The profile is validated at this boundary; the engine itself
/// never fails on malformed fields.
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    let errors = req.validation_errors();
    if !errors.is_empty() {
        tracing::info!("Validation failed for recommend request: {:?}", errors);
        return HttpResponse::BadRequest().json(ValidationErrorResponse {
            error: "Validation failed".to_string(),
            details: errors,
            status_code: 400,
        });
    }

    let language = req.language.clone().unwrap_or_else(|| "en".to_string());
    let matches = state
        .matcher
        .find_matches(&req.profile, state.catalog.all_schemes());

    tracing::info!(
        "Returning {} matches (state={:?}, age={:?})",
        matches.len(),
        req.profile.state,
        req.profile.age
    );

    HttpResponse::Ok().json(RecommendResponse {
        success: true,
        total_matches: matches.len(),
        schemes: matches,
        user_summary: UserSummary {
            state: req.profile.state.clone(),
            age: req.profile.age,
            category: req.profile.category.clone(),
            language,
        },
    })
}
