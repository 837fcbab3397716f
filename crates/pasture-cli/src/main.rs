mod review;
mod search;
mod sitemap;

use chrono::Utc;
use clap::{Parser, Subcommand};
use pasture_core::{LocationCatalog, VendorStatus};
use pasture_db::PgVendorRepository;
use tracing_subscriber::EnvFilter;

const DEFAULT_SITE_URL: &str = "https://pasturepickup.com";

#[derive(Debug, Parser)]
#[command(name = "pasture-cli")]
#[command(about = "Pasture Pickup operator command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the XML sitemap for every static and landing page
    Sitemap {
        /// Public site origin prefixed to every path
        #[arg(long, env = "PASTURE_SITE_URL", default_value = DEFAULT_SITE_URL)]
        base_url: String,
    },
    /// List every landing-page path with its kind
    Paths,
    /// Rank active vendors around a point
    Search {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in miles (defaults to the configured search radius)
        #[arg(long)]
        radius: Option<f64>,
        /// Free-text service term, e.g. "horse"
        #[arg(long)]
        service: Option<String>,
    },
    /// List submissions awaiting review, oldest first
    Pending,
    /// Approve a pending submission and publish it as an active vendor
    Approve { id: String },
    /// Reject a pending submission
    Reject { id: String },
    /// Set a vendor's listing status (active, pending, inactive)
    VendorStatus { id: String, status: VendorStatus },
}

fn init_tracing() -> anyhow::Result<()> {
    let fallback = std::env::var("PASTURE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing()?;

    let cli = Cli::parse();
    let catalog = LocationCatalog::us();

    match cli.command {
        Commands::Sitemap { base_url } => {
            catalog.validate()?;
            let entries = sitemap::sitemap_entries(&catalog, &base_url, Utc::now().date_naive());
            sitemap::write_sitemap(std::io::stdout().lock(), &entries)
        }
        Commands::Paths => {
            sitemap::run_paths(&catalog);
            Ok(())
        }
        command => {
            let config = pasture_core::load_app_config()?;
            let pool_config = pasture_db::PoolConfig::from_app_config(&config);
            let pool = pasture_db::connect_pool(&config.database_url, pool_config).await?;
            let repository = PgVendorRepository::new(pool);
            run_with_repository(command, &repository, &config).await
        }
    }
}

async fn run_with_repository(
    command: Commands,
    repository: &dyn pasture_core::VendorRepository,
    config: &pasture_core::AppConfig,
) -> anyhow::Result<()> {
    match command {
        Commands::Search {
            lat,
            lng,
            radius,
            service,
        } => {
            let radius = radius.unwrap_or(config.search_radius_miles);
            search::run_search(
                repository,
                config.service_match,
                lat,
                lng,
                radius,
                service.as_deref(),
            )
            .await
        }
        Commands::Pending => review::run_pending(repository).await,
        Commands::Approve { id } => review::run_approve(repository, &id).await,
        Commands::Reject { id } => review::run_reject(repository, &id).await,
        Commands::VendorStatus { id, status } => {
            review::run_vendor_status(repository, &id, status).await
        }
        Commands::Sitemap { .. } | Commands::Paths => {
            anyhow::bail!("catalog commands do not use the database")
        }
    }
}
