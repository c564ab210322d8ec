// Route exports
pub mod chat;
pub mod recommend;
pub mod schemes;

use std::sync::Arc;

use actix_web::web;

use crate::chat::SchemeBot;
use crate::core::Matcher;
use crate::services::Catalog;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub matcher: Matcher,
    pub bot: Arc<SchemeBot>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(recommend::configure)
            .configure(chat::configure)
            .configure(schemes::configure),
    );
}
