//! Saarthi Algo - scheme matching and recommendation service
//!
//! This library provides the core recommendation pipeline used by the
//! Saarthi citizen assistant: eligibility matching and scoring over a
//! welfare-scheme catalog, a lightweight text search index, and the entity
//! extraction plus conversation memory that reduce free text to the same
//! structured profile the matcher consumes.

pub mod chat;
pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod search;
pub mod services;

// Re-export commonly used types
pub use chat::{ConversationMemory, EntityExtractor, SchemeBot};
pub use core::{passes_hard_filters, Matcher, ScoringEngine};
pub use models::{
    EligibilityRules, Scheme, ScoredScheme, ScoringWeights, SearchHit, UserProfile,
};
pub use search::SearchIndex;
pub use services::Catalog;
