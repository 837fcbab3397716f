//! Google Geocoding API client implementing [`pasture_core::Geocoder`].

mod client;
mod error;
mod types;

pub use client::{GoogleGeocoder, DEFAULT_BASE_URL};
pub use error::GeocodeError;
