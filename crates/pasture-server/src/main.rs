mod api;
mod map_provider;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use pasture_core::{Geocoder, VendorRepository};
use pasture_db::PgVendorRepository;
use pasture_geocode::GoogleGeocoder;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    map_provider::MapProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = pasture_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let api_key = config
        .google_maps_api_key
        .as_deref()
        .context("GOOGLE_MAPS_API_KEY is required to geocode submissions")?;
    let geocoder = GoogleGeocoder::with_base_url(
        api_key,
        config.geocoder_timeout_secs,
        &config.geocoder_user_agent,
        &config.geocoder_base_url,
    )?;

    let pool_config = pasture_db::PoolConfig::from_app_config(&config);
    let pool = pasture_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = pasture_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations complete");

    let repository: Arc<dyn VendorRepository> = Arc::new(PgVendorRepository::new(pool));
    let geocoder: Arc<dyn Geocoder> = Arc::new(geocoder);
    let map_provider = Arc::new(MapProvider::from_config(&config));
    let state = AppState::from_config(&config, repository, geocoder, map_provider);
    state
        .catalog
        .validate()
        .context("location catalog has ambiguous routes")?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "pasture-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
