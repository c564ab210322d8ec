// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use filters::passes_hard_filters;
pub use matcher::{Matcher, MAX_RESULTS, MIN_MATCH_SCORE};
pub use scoring::{ScoringEngine, NEUTRAL_SCORE};
