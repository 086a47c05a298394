//! Retrieval of raw collection documents from static storage.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{DocsError, DocsResult};
use crate::models::{Category, Collection, CountryCode};

/// Filename convention used by the exported collections.
pub fn collection_file_name(country: CountryCode, category: Category) -> String {
    format!(
        "{}_-_{}_postman_collection.json",
        country.file_label(),
        category.file_label()
    )
}

#[async_trait]
pub trait CollectionFetcher: Send + Sync {
    async fn fetch(&self, country: CountryCode, category: Category) -> DocsResult<Collection>;
}

/// Fetches collection documents with a plain unauthenticated GET.
pub struct HttpFetcher {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CollectionFetcher for HttpFetcher {
    async fn fetch(&self, country: CountryCode, category: Category) -> DocsResult<Collection> {
        let url = format!("{}/{}", self.base_url, collection_file_name(country, category));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| DocsError::Fetch {
                location: url.clone(),
                source,
            })?;
        let text = response.text().await.map_err(|source| DocsError::Fetch {
            location: url.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| DocsError::Decode { location: url, source })
    }
}

/// Reads collection documents from a local assets directory.
pub struct FileFetcher {
    assets_dir: PathBuf,
}

impl FileFetcher {
    pub fn new(assets_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
        }
    }
}

#[async_trait]
impl CollectionFetcher for FileFetcher {
    async fn fetch(&self, country: CountryCode, category: Category) -> DocsResult<Collection> {
        let path = self.assets_dir.join(collection_file_name(country, category));
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| DocsError::Io {
                path: path.clone(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|source| DocsError::Decode {
            location: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_the_export_convention() {
        assert_eq!(
            collection_file_name(CountryCode::Gtm, Category::Payin),
            "Guatemala_-_Payin_postman_collection.json"
        );
        assert_eq!(
            collection_file_name(CountryCode::Dom, Category::Payout),
            "Republica_Dominicana_-_PayOut_postman_collection.json"
        );
    }

    #[tokio::test]
    async fn file_fetcher_reports_missing_documents() {
        let fetcher = FileFetcher::new("does/not/exist");
        let err = fetcher
            .fetch(CountryCode::Gtm, Category::Payin)
            .await
            .expect_err("should fail");
        assert!(matches!(err, DocsError::Io { .. }));
    }
}
