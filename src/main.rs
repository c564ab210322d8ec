mod chat;
mod config;
mod core;
mod models;
mod routes;
mod search;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use std::sync::Arc;
use tracing::{error, info};

use chat::{ConversationMemory, SchemeBot, DEFAULT_MAX_HISTORY, DEFAULT_MAX_SESSIONS};
use config::Settings;
use core::{Matcher, MAX_RESULTS, MIN_MATCH_SCORE};
use models::ScoringWeights;
use routes::AppState;
use search::SearchIndex;
use services::Catalog;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt().with_target(false).with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Saarthi Algo scheme matching service...");

    // Load configuration; every section has working defaults, so a broken
    // config file degrades to defaults instead of taking the service down.
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration, using defaults: {}", e);
        Settings::default()
    });

    // Load the scheme catalog. A citizen-facing tool stays up even with a
    // missing or partial catalog; it just serves empty result sets.
    let catalog = Arc::new(match Catalog::load(&settings.catalog.path) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!(
                "Failed to load catalog from {}: {} - serving an empty catalog",
                settings.catalog.path, e
            );
            Catalog::empty()
        }
    });
    if catalog.is_empty() {
        error!("Catalog is empty; match and search results will be empty");
    }

    // Build the search index once over the immutable catalog.
    let index = Arc::new(SearchIndex::build(Arc::clone(&catalog)));

    info!("Search index initialized over {} schemes", catalog.len());

    // Initialize matcher with configured weights
    let weights = ScoringWeights {
        age: settings.scoring.weights.age,
        gender: settings.scoring.weights.gender,
        state: settings.scoring.weights.state,
        category: settings.scoring.weights.category,
        income: settings.scoring.weights.income,
        occupation: settings.scoring.weights.occupation,
        special: settings.scoring.weights.special,
    };

    let matcher = Matcher::new(weights).with_limits(
        settings.matching.min_score.unwrap_or(MIN_MATCH_SCORE),
        settings.matching.max_results.unwrap_or(MAX_RESULTS),
    );

    info!("Matcher initialized with weights: {:?}", weights);

    // Conversation memory with bounded session count and history.
    let memory = ConversationMemory::new(
        settings.memory.max_sessions.unwrap_or(DEFAULT_MAX_SESSIONS),
        settings.memory.max_history.unwrap_or(DEFAULT_MAX_HISTORY),
    );

    let bot = Arc::new(SchemeBot::new(
        Arc::clone(&catalog),
        Arc::clone(&index),
        memory,
    ));

    // Build application state
    let app_state = AppState {
        catalog,
        matcher,
        bot,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
