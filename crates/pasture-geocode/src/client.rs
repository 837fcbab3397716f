//! HTTP client for the Google Geocoding REST API.
//!
//! Forward lookups are restricted to the United States. A `ZERO_RESULTS`
//! answer is "not found" (`Ok(None)`); every other non-`OK` status is an
//! error, so callers can tell a bad address from an unavailable service.

use std::time::Duration;

use async_trait::async_trait;
use pasture_core::{BoxError, GeoPoint, GeocodeResult, Geocoder};
use reqwest::{Client, Url};

use crate::error::GeocodeError;
use crate::types::{GeocodeEntry, GeocodeResponse, LatLng};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/";
const DEFAULT_USER_AGENT: &str = "pasture-pickup/0.1 (vendor-intake)";

pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GoogleGeocoder {
    /// Client pointed at the production Geocoding API.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, GeocodeError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_USER_AGENT, DEFAULT_BASE_URL)
    }

    /// Client with a custom base URL (a mock server in tests, or a proxy).
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|source| GeocodeError::Http {
                context: "client builder".to_string(),
                source,
            })?;

        // Exactly one trailing slash, so joining "json" appends a segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Forward-geocode a free-text US address.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Api`] for statuses such as `REQUEST_DENIED` or
    ///   `OVER_QUERY_LIMIT`.
    /// - [`GeocodeError::Http`] on network failure or a non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected shape.
    pub async fn lookup_address(&self, address: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        let url = self.build_url(&[("address", address), ("components", "country:US")])?;
        let Some(entry) = self.first_result(&url).await? else {
            tracing::debug!(%address, "geocoder found no match");
            return Ok(None);
        };
        let location = entry.geometry.location;
        Ok(Some(to_result(entry, location)))
    }

    /// Reverse-geocode a point. The returned coordinates echo the input.
    ///
    /// # Errors
    ///
    /// Same as [`GoogleGeocoder::lookup_address`].
    pub async fn lookup_point(&self, point: GeoPoint) -> Result<Option<GeocodeResult>, GeocodeError> {
        let latlng = format!("{},{}", point.lat, point.lng);
        let url = self.build_url(&[("latlng", &latlng)])?;
        let Some(entry) = self.first_result(&url).await? else {
            return Ok(None);
        };
        Ok(Some(to_result(
            entry,
            LatLng {
                lat: point.lat,
                lng: point.lng,
            },
        )))
    }

    fn build_url(&self, params: &[(&str, &str)]) -> Result<Url, GeocodeError> {
        let mut url = self
            .base_url
            .join("json")
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    async fn first_result(&self, url: &Url) -> Result<Option<GeocodeEntry>, GeocodeError> {
        let transport = |e: reqwest::Error| GeocodeError::Http {
            context: redact_key(url),
            source: e.without_url(),
        };
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(transport)?;
        let body = response.text().await.map_err(transport)?;
        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: redact_key(url),
                source: e,
            })?;

        match parsed.status.as_str() {
            "OK" => Ok(parsed.results.into_iter().next()),
            "ZERO_RESULTS" => Ok(None),
            _ => {
                let message = parsed
                    .error_message
                    .unwrap_or_else(|| "no error message".to_string());
                tracing::error!(status = %parsed.status, %message, "geocoding API error");
                Err(GeocodeError::Api {
                    status: parsed.status,
                    message,
                })
            }
        }
    }
}

fn to_result(entry: GeocodeEntry, location: LatLng) -> GeocodeResult {
    let mut city = None;
    let mut state = None;
    let mut state_code = None;
    let mut country = None;

    for component in entry.address_components {
        if component.has_type("locality") {
            city = Some(component.long_name);
        } else if component.has_type("administrative_area_level_1") {
            state = Some(component.long_name);
            state_code = Some(component.short_name);
        } else if component.has_type("country") {
            country = Some(component.long_name);
        }
    }

    GeocodeResult {
        latitude: location.lat,
        longitude: location.lng,
        formatted_address: entry.formatted_address,
        city,
        state,
        state_code,
        country,
    }
}

/// The request URL without the API key, for error context.
fn redact_key(url: &Url) -> String {
    let mut clean = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "key")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    clean.query_pairs_mut().clear().extend_pairs(kept);
    clean.to_string()
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, BoxError> {
        self.lookup_address(address).await.map_err(BoxError::from)
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<Option<GeocodeResult>, BoxError> {
        self.lookup_point(point).await.map_err(BoxError::from)
    }
}
