use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Scheme, SearchHit};
use crate::search::keywords::CATEGORY_KEYWORDS;
use crate::search::similarity::normalized_similarity;
use crate::services::Catalog;

/// Minimum total score a scheme must reach to be included in search results.
pub const MIN_RELEVANCE: f64 = 10.0;

/// Lowercase alphabetic tokens of length >= 3.
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]{3,}").expect("valid regex"));

/// Keyword search over the scheme catalog.
///
/// Built once at startup from the immutable catalog: an inverted index from
/// token to scheme positions plus a direct id lookup. Query scoring is a
/// fixed heuristic - name similarity, token hits and category trigger words -
/// and its thresholds are part of the service contract, since small numeric
/// changes visibly reorder results.
#[derive(Debug)]
pub struct SearchIndex {
    catalog: Arc<Catalog>,
    keyword_index: HashMap<String, Vec<usize>>,
    id_map: HashMap<String, usize>,
}

impl SearchIndex {
    /// Index name, description, category and benefits text of every scheme.
    pub fn build(catalog: Arc<Catalog>) -> Self {
        let mut keyword_index: HashMap<String, Vec<usize>> = HashMap::new();
        let mut id_map = HashMap::new();

        for (pos, scheme) in catalog.all_schemes().iter().enumerate() {
            id_map.insert(scheme.id.clone(), pos);

            let text = format!(
                "{} {} {} {}",
                scheme.name, scheme.description, scheme.category, scheme.benefits
            )
            .to_lowercase();

            let tokens: HashSet<&str> =
                TOKEN_RE.find_iter(&text).map(|m| m.as_str()).collect();
            for token in tokens {
                keyword_index.entry(token.to_string()).or_default().push(pos);
            }
        }

        tracing::debug!(
            "Search index built: {} schemes, {} distinct tokens",
            catalog.len(),
            keyword_index.len()
        );

        Self {
            catalog,
            keyword_index,
            id_map,
        }
    }

    /// Search schemes by free-text query, returning at most `max_results`
    /// hits ranked by descending score. Equal scores rank by catalog order.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        let query_lower = query.trim().to_lowercase();
        let schemes = self.catalog.all_schemes();
        let mut scores: HashMap<usize, f64> = HashMap::new();

        // 1. Direct name matching: edit similarity above 0.5 plus a flat
        //    bonus for each query word appearing verbatim in the name.
        for (pos, scheme) in schemes.iter().enumerate() {
            let name = scheme.name.to_lowercase();

            let similarity = normalized_similarity(&query_lower, &name);
            if similarity > 0.5 {
                *scores.entry(pos).or_insert(0.0) += similarity * 100.0;
            }

            for word in query_lower.split_whitespace() {
                if word.len() >= 3 && name.contains(word) {
                    *scores.entry(pos).or_insert(0.0) += 30.0;
                }
            }
        }

        // 2. Inverted-index hits: exact token matches, then substring
        //    matches in either direction to tolerate stemming variance.
        //    An exact token of length >= 4 also earns the partial credit.
        let query_tokens: Vec<&str> =
            TOKEN_RE.find_iter(&query_lower).map(|m| m.as_str()).collect();
        for word in &query_tokens {
            if let Some(positions) = self.keyword_index.get(*word) {
                for &pos in positions {
                    *scores.entry(pos).or_insert(0.0) += 10.0;
                }
            }

            if word.len() >= 4 {
                for (indexed_word, positions) in &self.keyword_index {
                    if indexed_word.contains(word) || word.contains(indexed_word.as_str()) {
                        for &pos in positions {
                            *scores.entry(pos).or_insert(0.0) += 5.0;
                        }
                    }
                }
            }
        }

        // 3. Category trigger words boost every scheme of the category.
        for (category, triggers) in CATEGORY_KEYWORDS {
            if triggers.iter().any(|kw| query_lower.contains(kw)) {
                for (pos, scheme) in schemes.iter().enumerate() {
                    if scheme.category.eq_ignore_ascii_case(category) {
                        *scores.entry(pos).or_insert(0.0) += 20.0;
                    }
                }
            }
        }

        let mut ranked: Vec<(usize, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(max_results);

        ranked
            .into_iter()
            .filter(|(_, score)| *score >= MIN_RELEVANCE)
            .map(|(pos, score)| SearchHit {
                scheme: schemes[pos].clone(),
                search_score: score,
            })
            .collect()
    }

    /// All schemes in a category.
    pub fn by_category(&self, category: &str) -> Vec<&Scheme> {
        self.catalog.by_category(category)
    }

    /// Direct id lookup.
    pub fn by_id(&self, scheme_id: &str) -> Option<&Scheme> {
        self.id_map
            .get(scheme_id)
            .map(|&pos| &self.catalog.all_schemes()[pos])
    }
}
