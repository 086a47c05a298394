mod error;
mod loader;
mod models;
mod sandbox;
mod search;
mod theme;
mod transformer;
mod web;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use loader::{CollectionFetcher, EndpointService, FileFetcher, HttpFetcher, LoaderConfig};
use models::{Category, CountryCode, EndpointCatalog};
use sandbox::SandboxClient;
use theme::ThemeService;

#[derive(Parser)]
#[command(name = "tupay-docs")]
#[command(about = "TuPay API documentation backend")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform a country's Postman collections into the normalized catalog
    Transform {
        /// Country to transform (GTM or DOM)
        #[arg(short, long)]
        country: String,
        /// Directory holding the exported collection documents
        #[arg(long, env = "TUPAY_ASSETS_DIR", default_value = "assets/data/endpoints")]
        assets_dir: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Start the documentation API server
    Serve {
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Directory holding the exported collection documents
        #[arg(long, env = "TUPAY_ASSETS_DIR", default_value = "assets/data/endpoints")]
        assets_dir: PathBuf,
        /// Fetch collections from a remote static host instead of local disk
        #[arg(long, env = "TUPAY_ASSETS_URL")]
        assets_url: Option<String>,
        /// Publish the surviving direction when the other collection fails
        #[arg(long)]
        partial_success: bool,
        /// Theme preference state file
        #[arg(long, default_value = ".tupay-theme")]
        theme_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".parse().expect("static filter")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Transform {
            country,
            assets_dir,
            output,
        } => {
            let country = CountryCode::parse(&country)
                .with_context(|| format!("unknown country code: {country}"))?;
            info!(
                country = country.as_str(),
                base_url = country.info().base_url,
                "transforming collections"
            );

            let fetcher = FileFetcher::new(&assets_dir);
            let mut endpoints = Vec::new();
            for category in [Category::Payin, Category::Payout] {
                let collection = fetcher.fetch(country, category).await?;
                let groups = transformer::transform_collection(&collection, category);
                endpoints.extend(groups.into_iter().flat_map(|group| group.endpoints));
            }

            let catalog = EndpointCatalog {
                country,
                endpoints,
                transformed_at: chrono::Utc::now(),
            };

            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "data/{}_endpoints.json",
                    country.as_str().to_lowercase()
                ))
            });
            if let Some(parent) = output_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output_path, serde_json::to_string_pretty(&catalog)?)?;
            info!(
                path = %output_path.display(),
                count = catalog.endpoints.len(),
                "catalog written"
            );
        }
        Commands::Serve {
            port,
            assets_dir,
            assets_url,
            partial_success,
            theme_file,
        } => {
            let fetcher: Box<dyn CollectionFetcher> = match &assets_url {
                Some(url) => Box::new(HttpFetcher::new(url.clone())),
                None => Box::new(FileFetcher::new(&assets_dir)),
            };
            let service = Arc::new(EndpointService::new(
                fetcher,
                LoaderConfig { partial_success },
            ));
            let theme = Arc::new(ThemeService::new(theme_file));
            let sandbox = Arc::new(SandboxClient::new());

            web::run_server(
                service,
                theme,
                sandbox,
                web::ServerConfig { port, assets_dir },
            )
            .await?;
        }
    }

    Ok(())
}
