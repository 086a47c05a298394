//! Per-country endpoint loading, caching and broadcast state.

use std::collections::HashMap;

use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

use crate::models::{Category, CountryCode, Endpoint, EndpointGroup};
use crate::transformer::transform_collection;

use super::fetcher::CollectionFetcher;

/// Loader behavior toggles.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Publish the surviving direction when the other one fails. The
    /// compatibility default collapses the whole country to an empty list.
    pub partial_success: bool,
}

/// Published load state, so a failed load is distinguishable from a country
/// that genuinely has no endpoints.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "lowercase")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

pub struct EndpointService {
    fetcher: Box<dyn CollectionFetcher>,
    config: LoaderConfig,
    cache: Mutex<HashMap<CountryCode, Vec<Endpoint>>>,
    endpoints_tx: watch::Sender<Vec<Endpoint>>,
    loading_tx: watch::Sender<bool>,
    status_tx: watch::Sender<LoadStatus>,
    country_tx: watch::Sender<CountryCode>,
}

impl EndpointService {
    pub fn new(fetcher: Box<dyn CollectionFetcher>, config: LoaderConfig) -> Self {
        let (endpoints_tx, _) = watch::channel(Vec::new());
        let (loading_tx, _) = watch::channel(false);
        let (status_tx, _) = watch::channel(LoadStatus::Idle);
        let (country_tx, _) = watch::channel(CountryCode::Gtm);
        Self {
            fetcher,
            config,
            cache: Mutex::new(HashMap::new()),
            endpoints_tx,
            loading_tx,
            status_tx,
            country_tx,
        }
    }

    pub fn endpoints(&self) -> watch::Receiver<Vec<Endpoint>> {
        self.endpoints_tx.subscribe()
    }

    pub fn loading(&self) -> watch::Receiver<bool> {
        self.loading_tx.subscribe()
    }

    pub fn status(&self) -> watch::Receiver<LoadStatus> {
        self.status_tx.subscribe()
    }

    pub fn current_country(&self) -> CountryCode {
        *self.country_tx.borrow()
    }

    pub async fn set_current_country(&self, country: CountryCode) -> Vec<Endpoint> {
        self.country_tx.send_replace(country);
        self.load_endpoints_for_country(country).await
    }

    /// Loads and publishes the country's combined endpoint list. Cached
    /// results are republished without any fetch; a miss fetches both traffic
    /// directions concurrently and joins them payin-first.
    pub async fn load_endpoints_for_country(&self, country: CountryCode) -> Vec<Endpoint> {
        if let Some(cached) = self.cache.lock().await.get(&country).cloned() {
            self.endpoints_tx.send_replace(cached.clone());
            self.status_tx.send_replace(LoadStatus::Ready);
            return cached;
        }

        self.loading_tx.send_replace(true);
        self.status_tx.send_replace(LoadStatus::Loading);
        info!(country = country.as_str(), "loading endpoint collections");

        let (payin, payout) = tokio::join!(
            self.load_direction(country, Category::Payin),
            self.load_direction(country, Category::Payout),
        );

        let failures: Vec<String> = [payin.as_ref().err(), payout.as_ref().err()]
            .into_iter()
            .flatten()
            .map(|err| err.to_string())
            .collect();
        for failure in &failures {
            warn!(country = country.as_str(), error = %failure, "collection load failed");
        }

        let endpoints = if failures.is_empty() || self.config.partial_success {
            let mut endpoints = payin.unwrap_or_default();
            endpoints.extend(payout.unwrap_or_default());
            endpoints
        } else {
            Vec::new()
        };

        // Only complete loads are cached; a later request for the same
        // country retries the failed direction.
        if failures.is_empty() {
            self.cache.lock().await.insert(country, endpoints.clone());
        }

        let status = if failures.is_empty() {
            LoadStatus::Ready
        } else {
            LoadStatus::Failed(failures.join("; "))
        };
        self.endpoints_tx.send_replace(endpoints.clone());
        self.loading_tx.send_replace(false);
        self.status_tx.send_replace(status);

        endpoints
    }

    async fn load_direction(
        &self,
        country: CountryCode,
        category: Category,
    ) -> crate::error::DocsResult<Vec<Endpoint>> {
        let collection = self.fetcher.fetch(country, category).await?;
        let groups = transform_collection(&collection, category);
        Ok(groups.into_iter().flat_map(|group| group.endpoints).collect())
    }

    pub fn endpoint_by_id(&self, id: &str) -> Option<Endpoint> {
        self.endpoints_tx
            .borrow()
            .iter()
            .find(|endpoint| endpoint.id == id)
            .cloned()
    }

    pub fn endpoints_by_category(&self, category: Category) -> Vec<Endpoint> {
        self.endpoints_tx
            .borrow()
            .iter()
            .filter(|endpoint| endpoint.category == category)
            .cloned()
            .collect()
    }

    /// Sidebar groups: a partition of the published list by category, not the
    /// original folder structure.
    pub fn endpoint_groups(&self) -> Vec<EndpointGroup> {
        let payin = self.endpoints_by_category(Category::Payin);
        let payout = self.endpoints_by_category(Category::Payout);

        let mut groups = Vec::new();
        if !payin.is_empty() {
            groups.push(EndpointGroup {
                name: "PayIn".to_string(),
                description: "Endpoints para recibir pagos".to_string(),
                endpoints: payin,
                icon: "arrow-down-circle".to_string(),
            });
        }
        if !payout.is_empty() {
            groups.push(EndpointGroup {
                name: "PayOut".to_string(),
                description: "Endpoints para enviar fondos".to_string(),
                endpoints: payout,
                icon: "arrow-up-circle".to_string(),
            });
        }
        groups
    }
}
