use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::models::{ErrorResponse, HealthResponse, Scheme, SchemeListResponse, StateRule, INDIAN_STATES};
use crate::routes::AppState;

/// Configure catalog browsing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/schemes", web::get().to(list_schemes))
        .route("/schemes/{id}", web::get().to(scheme_detail))
        .route("/states", web::get().to(list_states))
        .route("/categories", web::get().to(list_categories));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let status = if state.catalog.is_empty() {
        "degraded"
    } else {
        "healthy"
    };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        total_schemes: state.catalog.len(),
        timestamp: chrono::Utc::now(),
    })
}

#[derive(Debug, Deserialize)]
struct SchemeFilters {
    category: Option<String>,
    #[serde(rename = "type")]
    scheme_type: Option<String>,
    state: Option<String>,
}

/// List schemes with optional category/type/state filters
///
/// GET /api/schemes?category=...&type=...&state=...
async fn list_schemes(
    state: web::Data<AppState>,
    query: web::Query<SchemeFilters>,
) -> impl Responder {
    let mut schemes: Vec<Scheme> = state.catalog.all_schemes().to_vec();

    if let Some(category) = &query.category {
        schemes.retain(|s| s.category.eq_ignore_ascii_case(category));
    }
    if let Some(scheme_type) = &query.scheme_type {
        schemes.retain(|s| s.scheme_type.eq_ignore_ascii_case(scheme_type));
    }
    if let Some(user_state) = &query.state {
        schemes.retain(|s| match &s.eligibility.states {
            StateRule::All => true,
            StateRule::AnyOf(states) => states.iter().any(|candidate| candidate == user_state),
        });
    }

    HttpResponse::Ok().json(SchemeListResponse {
        total: schemes.len(),
        schemes,
    })
}

/// Single scheme lookup
///
/// GET /api/schemes/{id}
async fn scheme_detail(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let scheme_id = path.into_inner();
    match state.catalog.by_id(&scheme_id) {
        Some(scheme) => HttpResponse::Ok().json(serde_json::json!({ "scheme": scheme })),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: "Scheme not found".to_string(),
            message: format!("No scheme with id '{}'", scheme_id),
            status_code: 404,
        }),
    }
}

/// GET /api/states
async fn list_states() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "states": INDIAN_STATES }))
}

/// GET /api/categories
async fn list_categories(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "categories": state.catalog.categories() }))
}
