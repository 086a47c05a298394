//! Substring-relevance search over the published endpoint list. Stateless:
//! a pure function of the list and the query options.

use crate::models::{Endpoint, SearchOptions, SearchResult, SearchResultType};

const DEFAULT_LIMIT: usize = 10;
const SCORE_THRESHOLD: f32 = 0.1;
/// Raw scores are clamped to this ceiling before normalizing to 0..1.
const MAX_RAW_SCORE: f32 = 5.0;

pub fn search(endpoints: &[Endpoint], options: &SearchOptions) -> Vec<SearchResult> {
    let query = options.query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = endpoints
        .iter()
        .filter(|endpoint| {
            options
                .category
                .is_none_or(|category| endpoint.category == category)
        })
        .filter(|endpoint| {
            options
                .method
                .as_deref()
                .is_none_or(|method| endpoint.method.eq_ignore_ascii_case(method))
        })
        .filter_map(|endpoint| {
            let relevance = relevance_score(endpoint, &query);
            (relevance > SCORE_THRESHOLD).then(|| SearchResult {
                id: endpoint.id.clone(),
                result_type: SearchResultType::Endpoint,
                title: endpoint.name.clone(),
                description: endpoint.description.clone(),
                path: endpoint.path.clone(),
                category: endpoint.category,
                method: endpoint.method.clone(),
                relevance,
            })
        })
        .collect();

    results.sort_by(|a, b| b.relevance.total_cmp(&a.relevance));
    results.truncate(options.limit.unwrap_or(DEFAULT_LIMIT));
    results
}

fn relevance_score(endpoint: &Endpoint, query: &str) -> f32 {
    let words: Vec<&str> = query.split_whitespace().collect();
    let mut score: f32 = 0.0;

    // Name carries the highest weight.
    let name = endpoint.name.to_lowercase();
    if name.contains(query) {
        score += 2.0;
    }
    for word in &words {
        if name.contains(word) {
            score += 0.5;
        }
    }

    let description = endpoint.description.to_lowercase();
    if description.contains(query) {
        score += 1.0;
    }
    for word in &words {
        if description.contains(word) {
            score += 0.3;
        }
    }

    if endpoint.path.to_lowercase().contains(query) {
        score += 0.8;
    }

    for header in &endpoint.headers {
        if header.name.to_lowercase().contains(query) {
            score += 0.4;
        }
    }

    // Intent keywords.
    let method = endpoint.method.to_lowercase();
    for word in &words {
        if *word == method {
            score += 0.6;
        }
    }
    if query.contains(endpoint.category.as_str()) {
        score += 0.5;
    }

    score.min(MAX_RAW_SCORE) / MAX_RAW_SCORE
}
