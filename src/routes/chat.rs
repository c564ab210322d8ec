use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{ChatRequest, ChatResponse, ErrorResponse};
use crate::routes::AppState;

/// Configure chat routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/chat", web::post().to(chat));
}

/// Chat endpoint
///
/// POST /api/chat
///
/// Empty or whitespace-only messages are rejected here, at the orchestration
/// boundary; the underlying components accept any well-typed input.
async fn chat(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }
    if req.message.trim().is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Empty message".to_string(),
            message: "message must not be blank".to_string(),
            status_code: 400,
        });
    }

    tracing::debug!("Chat message for session {}", req.session_id);
    let response = state.bot.respond(&req.message, &req.session_id);

    HttpResponse::Ok().json(ChatResponse {
        success: true,
        response,
    })
}
