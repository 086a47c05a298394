//! Search shapes consumed by the documentation search modal.

use serde::{Deserialize, Serialize};

use super::endpoint::Category;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,
    pub result_type: SearchResultType,
    pub title: String,
    pub description: String,
    pub path: String,
    pub category: Category,
    pub method: String,
    pub relevance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchResultType {
    Endpoint,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchOptions {
    pub query: String,
    pub category: Option<Category>,
    pub method: Option<String>,
    pub limit: Option<usize>,
}
