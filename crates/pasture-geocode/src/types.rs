//! Wire types for the Geocoding API JSON envelope.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeEntry>,
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeEntry {
    pub formatted_address: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressComponent {
    pub long_name: String,
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    pub(crate) fn has_type(&self, wanted: &str) -> bool {
        self.types.iter().any(|t| t == wanted)
    }
}
