use crate::app_config::{AppConfig, Environment};
use crate::discovery::ServiceMatchMode;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from the variables already in the process,
/// without reading `.env`.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_page_size = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let size = or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if size == 0 {
            return Err(invalid(var, "must be at least 1".to_string()));
        }
        Ok(size)
    };

    let parse_miles = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let miles = or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !miles.is_finite() || miles <= 0.0 {
            return Err(invalid(var, "must be a positive number of miles".to_string()));
        }
        Ok(miles)
    };

    let parse_url = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Ok(raw)
        } else {
            Err(invalid(var, "must be an http(s) URL".to_string()))
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("PASTURE_ENV", "development"));
    let bind_addr = parse_addr("PASTURE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("PASTURE_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("PASTURE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("PASTURE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PASTURE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let google_maps_api_key = optional("GOOGLE_MAPS_API_KEY");
    let geocoder_base_url = parse_url(
        "PASTURE_GEOCODER_BASE_URL",
        "https://maps.googleapis.com/maps/api/geocode/",
    )?;
    let geocoder_timeout_secs = parse_u64("PASTURE_GEOCODER_TIMEOUT_SECS", "10")?;
    let geocoder_user_agent = or_default(
        "PASTURE_GEOCODER_USER_AGENT",
        "pasture-pickup/0.1 (vendor-intake)",
    );

    let mapbox_access_token = optional("MAPBOX_ACCESS_TOKEN");
    let google_places_api_key = optional("GOOGLE_PLACES_API_KEY");
    let map_style_url = or_default("PASTURE_MAP_STYLE_URL", "mapbox://styles/mapbox/light-v11");

    let search_radius_miles = parse_miles("PASTURE_SEARCH_RADIUS_MILES", "50")?;
    let home_radius_miles = parse_miles("PASTURE_HOME_RADIUS_MILES", "100")?;
    let page_size = parse_page_size("PASTURE_PAGE_SIZE", "8")?;
    let service_match = or_default("PASTURE_SERVICE_MATCH", "first-token")
        .parse::<ServiceMatchMode>()
        .map_err(|e| invalid("PASTURE_SERVICE_MATCH", e.to_string()))?;
    let site_url = parse_url("PASTURE_SITE_URL", "https://pasturepickup.com")?
        .trim_end_matches('/')
        .to_string();

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        google_maps_api_key,
        geocoder_base_url,
        geocoder_timeout_secs,
        geocoder_user_agent,
        mapbox_access_token,
        google_places_api_key,
        map_style_url,
        search_radius_miles,
        home_radius_miles,
        page_size,
        service_match,
        site_url,
    })
}

/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
