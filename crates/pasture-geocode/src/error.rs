use thiserror::Error;

/// Errors returned by the geocoding client.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or TLS failure, or a non-2xx HTTP status. `context` is the
    /// request URL with the key removed; `source` carries no URL.
    #[error("HTTP error for {context}: {source}")]
    Http {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a status other than `OK` or `ZERO_RESULTS`.
    #[error("geocoding API error {status}: {message}")]
    Api { status: String, message: String },

    #[error("invalid geocoder base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
