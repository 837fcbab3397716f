use std::net::SocketAddr;

use crate::discovery::ServiceMatchMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub google_maps_api_key: Option<String>,
    pub geocoder_base_url: String,
    pub geocoder_timeout_secs: u64,
    pub geocoder_user_agent: String,
    pub mapbox_access_token: Option<String>,
    pub google_places_api_key: Option<String>,
    pub map_style_url: String,
    /// Radius used by the search-results page.
    pub search_radius_miles: f64,
    /// Default radius for the home map when the visitor shares a location.
    pub home_radius_miles: f64,
    pub page_size: usize,
    pub service_match: ServiceMatchMode,
    pub site_url: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "google_maps_api_key",
                &self.google_maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("geocoder_user_agent", &self.geocoder_user_agent)
            .field(
                "mapbox_access_token",
                &self.mapbox_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "google_places_api_key",
                &self.google_places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("map_style_url", &self.map_style_url)
            .field("search_radius_miles", &self.search_radius_miles)
            .field("home_radius_miles", &self.home_radius_miles)
            .field("page_size", &self.page_size)
            .field("service_match", &self.service_match)
            .field("site_url", &self.site_url)
            .finish()
    }
}
