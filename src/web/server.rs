//! HTTP surface of the documentation backend.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::loader::EndpointService;
use crate::models::{Category, CountryCode, SearchOptions, COUNTRIES};
use crate::sandbox::{SandboxClient, SandboxRequest};
use crate::search;
use crate::theme::{Theme, ThemeService};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub assets_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CountryQuery {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    country: Option<String>,
    category: Option<String>,
    method: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ThemeUpdate {
    theme: Theme,
}

pub async fn run_server(
    service: Arc<EndpointService>,
    theme: Arc<ThemeService>,
    sandbox: Arc<SandboxClient>,
    config: ServerConfig,
) -> Result<()> {
    let routes = routes(service, theme, sandbox, config.assets_dir);

    info!(port = config.port, "documentation server listening");
    warp::serve(routes)
        .run(([127, 0, 0, 1], config.port))
        .await;

    Ok(())
}

pub fn routes(
    service: Arc<EndpointService>,
    theme: Arc<ThemeService>,
    sandbox: Arc<SandboxClient>,
    assets_dir: PathBuf,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path!("api" / "health")
        .and(warp::get())
        .map(|| warp::reply::json(&json!({ "status": "healthy" })));

    let countries = warp::path!("api" / "countries")
        .and(warp::get())
        .map(|| warp::reply::json(&COUNTRIES));

    let endpoints = warp::path!("api" / "endpoints")
        .and(warp::get())
        .and(warp::query::<CountryQuery>())
        .and(with(service.clone()))
        .and_then(list_endpoints);

    let endpoint_by_id = warp::path!("api" / "endpoints" / String)
        .and(warp::get())
        .and(warp::query::<CountryQuery>())
        .and(with(service.clone()))
        .and_then(get_endpoint);

    let groups = warp::path!("api" / "groups")
        .and(warp::get())
        .and(warp::query::<CountryQuery>())
        .and(with(service.clone()))
        .and_then(list_groups);

    let status = warp::path!("api" / "status")
        .and(warp::get())
        .and(with(service.clone()))
        .map(|service: Arc<EndpointService>| {
            let loading = *service.loading().borrow();
            let status = service.status().borrow().clone();
            warp::reply::json(&json!({ "loading": loading, "status": status }))
        });

    let search_route = warp::path!("api" / "search")
        .and(warp::get())
        .and(warp::query::<SearchQuery>())
        .and(with(service.clone()))
        .and_then(search_endpoints);

    let theme_get = warp::path!("api" / "theme")
        .and(warp::get())
        .and(with(theme.clone()))
        .map(|theme: Arc<ThemeService>| warp::reply::json(&json!({ "theme": theme.get() })));

    let theme_put = warp::path!("api" / "theme")
        .and(warp::put())
        .and(warp::body::json::<ThemeUpdate>())
        .and(with(theme.clone()))
        .and_then(set_theme);

    let theme_toggle = warp::path!("api" / "theme" / "toggle")
        .and(warp::post())
        .and(with(theme))
        .and_then(toggle_theme);

    let sandbox_route = warp::path!("api" / "sandbox" / String)
        .and(warp::post())
        .and(warp::query::<CountryQuery>())
        .and(warp::body::json::<SandboxRequest>())
        .and(with(service))
        .and(with(sandbox))
        .and_then(run_sandbox);

    let assets = warp::path("assets")
        .and(warp::path("data"))
        .and(warp::path("endpoints"))
        .and(warp::fs::dir(assets_dir));

    health
        .or(countries)
        .or(endpoints)
        .or(endpoint_by_id)
        .or(groups)
        .or(status)
        .or(search_route)
        .or(theme_get)
        .or(theme_put)
        .or(theme_toggle)
        .or(sandbox_route)
        .or(assets)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_methods(vec!["GET", "POST", "PUT"])
                .allow_headers(vec!["content-type", "x-api-key"]),
        )
}

fn with<T: Clone + Send + 'static>(
    value: T,
) -> impl Filter<Extract = (T,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || value.clone())
}

fn error_reply(status: StatusCode, message: &str) -> warp::reply::Response {
    warp::reply::with_status(warp::reply::json(&json!({ "error": message })), status)
        .into_response()
}

/// Missing country parameter falls back to the currently selected country.
fn resolve_country(
    raw: Option<&str>,
    service: &EndpointService,
) -> Result<CountryCode, warp::reply::Response> {
    match raw {
        Some(raw) => CountryCode::parse(raw).ok_or_else(|| {
            error_reply(
                StatusCode::BAD_REQUEST,
                &format!("unknown country code: {raw}"),
            )
        }),
        None => Ok(service.current_country()),
    }
}

async fn list_endpoints(
    query: CountryQuery,
    service: Arc<EndpointService>,
) -> Result<warp::reply::Response, Rejection> {
    let country = match resolve_country(query.country.as_deref(), &service) {
        Ok(country) => country,
        Err(reply) => return Ok(reply),
    };
    let endpoints = service.load_endpoints_for_country(country).await;
    Ok(warp::reply::json(&endpoints).into_response())
}

async fn get_endpoint(
    id: String,
    query: CountryQuery,
    service: Arc<EndpointService>,
) -> Result<warp::reply::Response, Rejection> {
    let country = match resolve_country(query.country.as_deref(), &service) {
        Ok(country) => country,
        Err(reply) => return Ok(reply),
    };
    service.load_endpoints_for_country(country).await;
    match service.endpoint_by_id(&id) {
        Some(endpoint) => Ok(warp::reply::json(&endpoint).into_response()),
        None => Ok(error_reply(
            StatusCode::NOT_FOUND,
            &format!("endpoint not found: {id}"),
        )),
    }
}

async fn list_groups(
    query: CountryQuery,
    service: Arc<EndpointService>,
) -> Result<warp::reply::Response, Rejection> {
    let country = match resolve_country(query.country.as_deref(), &service) {
        Ok(country) => country,
        Err(reply) => return Ok(reply),
    };
    service.load_endpoints_for_country(country).await;
    Ok(warp::reply::json(&service.endpoint_groups()).into_response())
}

async fn search_endpoints(
    query: SearchQuery,
    service: Arc<EndpointService>,
) -> Result<warp::reply::Response, Rejection> {
    let country = match resolve_country(query.country.as_deref(), &service) {
        Ok(country) => country,
        Err(reply) => return Ok(reply),
    };
    let endpoints = service.load_endpoints_for_country(country).await;
    let options = SearchOptions {
        query: query.q.unwrap_or_default(),
        category: query.category.as_deref().and_then(Category::parse),
        method: query.method,
        limit: query.limit,
    };
    Ok(warp::reply::json(&search::search(&endpoints, &options)).into_response())
}

async fn set_theme(
    update: ThemeUpdate,
    theme: Arc<ThemeService>,
) -> Result<warp::reply::Response, Rejection> {
    match theme.set(update.theme) {
        Ok(applied) => Ok(warp::reply::json(&json!({ "theme": applied })).into_response()),
        Err(err) => Ok(error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &err.to_string(),
        )),
    }
}

async fn toggle_theme(theme: Arc<ThemeService>) -> Result<warp::reply::Response, Rejection> {
    match theme.toggle() {
        Ok(applied) => Ok(warp::reply::json(&json!({ "theme": applied })).into_response()),
        Err(err) => Ok(error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &err.to_string(),
        )),
    }
}

async fn run_sandbox(
    id: String,
    query: CountryQuery,
    request: SandboxRequest,
    service: Arc<EndpointService>,
    sandbox: Arc<SandboxClient>,
) -> Result<warp::reply::Response, Rejection> {
    let country = match resolve_country(query.country.as_deref(), &service) {
        Ok(country) => country,
        Err(reply) => return Ok(reply),
    };
    service.load_endpoints_for_country(country).await;
    let Some(endpoint) = service.endpoint_by_id(&id) else {
        return Ok(error_reply(
            StatusCode::NOT_FOUND,
            &format!("endpoint not found: {id}"),
        ));
    };
    match sandbox.execute(&endpoint, &request).await {
        Ok(response) => Ok(warp::reply::json(&response).into_response()),
        Err(err) => Ok(error_reply(StatusCode::BAD_GATEWAY, &err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{FileFetcher, LoaderConfig};
    use crate::models::Endpoint;

    fn write_collection(dir: &std::path::Path, file_name: &str, name: &str, direction: &str) {
        let doc = json!({
            "info": { "name": name },
            "item": [{
                "name": "Operaciones",
                "item": [{
                    "name": format!("{direction} status"),
                    "request": {
                        "method": "GET",
                        "url": format!("/api/{direction}/status")
                    }
                }]
            }]
        });
        std::fs::write(dir.join(file_name), doc.to_string()).expect("write fixture");
    }

    fn fixture(
        dir: &tempfile::TempDir,
    ) -> (Arc<EndpointService>, Arc<ThemeService>, Arc<SandboxClient>) {
        write_collection(
            dir.path(),
            "Guatemala_-_Payin_postman_collection.json",
            "Guatemala - PayIn",
            "payin",
        );
        write_collection(
            dir.path(),
            "Guatemala_-_PayOut_postman_collection.json",
            "Guatemala - PayOut",
            "payout",
        );
        let service = Arc::new(EndpointService::new(
            Box::new(FileFetcher::new(dir.path())),
            LoaderConfig::default(),
        ));
        let theme = Arc::new(ThemeService::new(dir.path().join("theme")));
        (service, theme, Arc::new(SandboxClient::new()))
    }

    #[tokio::test]
    async fn health_is_ok() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, theme, sandbox) = fixture(&dir);
        let api = routes(service, theme, sandbox, dir.path().to_path_buf());
        let resp = warp::test::request()
            .method("GET")
            .path("/api/health")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(String::from_utf8_lossy(resp.body()).contains("healthy"));
    }

    #[tokio::test]
    async fn endpoints_are_served_per_country() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, theme, sandbox) = fixture(&dir);
        let api = routes(service, theme, sandbox, dir.path().to_path_buf());
        let resp = warp::test::request()
            .method("GET")
            .path("/api/endpoints?country=GTM")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let endpoints: Vec<Endpoint> = serde_json::from_slice(resp.body()).expect("body");
        assert_eq!(endpoints.len(), 2);
        assert_eq!(endpoints[0].id, "payin-payin-status");
        assert_eq!(endpoints[1].id, "payout-payout-status");
    }

    #[tokio::test]
    async fn unknown_country_is_a_bad_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, theme, sandbox) = fixture(&dir);
        let api = routes(service, theme, sandbox, dir.path().to_path_buf());
        let resp = warp::test::request()
            .method("GET")
            .path("/api/endpoints?country=MEX")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn endpoint_lookup_404s_on_unknown_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, theme, sandbox) = fixture(&dir);
        let api = routes(service, theme, sandbox, dir.path().to_path_buf());
        let resp = warp::test::request()
            .method("GET")
            .path("/api/endpoints/payin-nope?country=GTM")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn groups_partition_by_category() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, theme, sandbox) = fixture(&dir);
        let api = routes(service, theme, sandbox, dir.path().to_path_buf());
        let resp = warp::test::request()
            .method("GET")
            .path("/api/groups?country=GTM")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8_lossy(resp.body()).to_string();
        assert!(body.contains("PayIn"));
        assert!(body.contains("PayOut"));
    }

    #[tokio::test]
    async fn search_scores_the_loaded_country() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, theme, sandbox) = fixture(&dir);
        let api = routes(service, theme, sandbox, dir.path().to_path_buf());
        let resp = warp::test::request()
            .method("GET")
            .path("/api/search?q=status&country=GTM")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8_lossy(resp.body()).to_string();
        assert!(body.contains("payin-payin-status"));
    }

    #[tokio::test]
    async fn theme_toggle_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, theme, sandbox) = fixture(&dir);
        let api = routes(service, theme, sandbox, dir.path().to_path_buf());
        let resp = warp::test::request()
            .method("POST")
            .path("/api/theme/toggle")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(String::from_utf8_lossy(resp.body()).contains("dark"));

        let resp = warp::test::request()
            .method("GET")
            .path("/api/theme")
            .reply(&api)
            .await;
        assert!(String::from_utf8_lossy(resp.body()).contains("dark"));
    }

    #[tokio::test]
    async fn countries_list_both_markets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (service, theme, sandbox) = fixture(&dir);
        let api = routes(service, theme, sandbox, dir.path().to_path_buf());
        let resp = warp::test::request()
            .method("GET")
            .path("/api/countries")
            .reply(&api)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = String::from_utf8_lossy(resp.body()).to_string();
        assert!(body.contains("GTM"));
        assert!(body.contains("DOM"));
    }
}
