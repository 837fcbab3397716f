//! Lazily initialised settings for the browser map SDK.
//!
//! One provider is shared by the whole application. The first successful
//! [`MapProvider::ready`] call fixes the settings for the process lifetime;
//! concurrent callers wait on that same initialisation. A failed attempt is
//! reported to every waiting caller and is retried on the next call.

use pasture_core::AppConfig;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::OnceCell;

pub const MAPBOX_TOKEN_VAR: &str = "MAPBOX_ACCESS_TOKEN";
pub const PLACES_KEY_VAR: &str = "GOOGLE_PLACES_API_KEY";

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// What the client needs to boot the map and its place autocomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSettings {
    pub access_token: String,
    pub style_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub places_api_key: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MapProviderError {
    #[error("map provider is not configured: {0} is not set")]
    MissingToken(&'static str),
}

pub struct MapProvider {
    lookup: Box<Lookup>,
    style_url: String,
    settings: OnceCell<MapSettings>,
}

impl std::fmt::Debug for MapProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapProvider")
            .field("style_url", &self.style_url)
            .field("initialised", &self.settings.initialized())
            .finish_non_exhaustive()
    }
}

impl MapProvider {
    /// Secrets come from the loaded config first, then from the process
    /// environment at initialisation time.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let token = config.mapbox_access_token.clone();
        let places = config.google_places_api_key.clone();
        Self::with_lookup(config.map_style_url.clone(), move |var| match var {
            MAPBOX_TOKEN_VAR => token.clone().or_else(|| std::env::var(var).ok()),
            PLACES_KEY_VAR => places.clone().or_else(|| std::env::var(var).ok()),
            _ => std::env::var(var).ok(),
        })
    }

    #[must_use]
    pub fn with_lookup<F>(style_url: impl Into<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
            style_url: style_url.into(),
            settings: OnceCell::new(),
        }
    }

    /// Resolve the settings, initialising them on first use.
    ///
    /// # Errors
    ///
    /// Returns [`MapProviderError::MissingToken`] while no access token is
    /// available.
    pub async fn ready(&self) -> Result<&MapSettings, MapProviderError> {
        self.settings.get_or_try_init(|| async { self.load() }).await
    }

    fn load(&self) -> Result<MapSettings, MapProviderError> {
        let Some(access_token) = self.secret(MAPBOX_TOKEN_VAR) else {
            tracing::warn!(var = MAPBOX_TOKEN_VAR, "map provider initialisation failed");
            return Err(MapProviderError::MissingToken(MAPBOX_TOKEN_VAR));
        };
        let places_api_key = self.secret(PLACES_KEY_VAR);

        tracing::info!(
            style_url = %self.style_url,
            places = places_api_key.is_some(),
            "map provider initialised"
        );
        Ok(MapSettings {
            access_token,
            style_url: self.style_url.clone(),
            places_api_key,
        })
    }

    fn secret(&self, var: &str) -> Option<String> {
        (self.lookup)(var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}
