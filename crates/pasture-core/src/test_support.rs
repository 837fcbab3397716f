//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::geo::GeoPoint;
use crate::repository::{BoxError, GeocodeResult, Geocoder};
use crate::vendor::{Vendor, VendorStatus};

pub(crate) fn vendor_at(id: &str, lat: Option<f64>, lng: Option<f64>) -> Vendor {
    let stamp = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    Vendor {
        id: id.to_string(),
        name: format!("Vendor {id}"),
        phone: "555-0100".to_string(),
        email: "ops@example.com".to_string(),
        website: None,
        address: "1 Ranch Rd".to_string(),
        city: "Austin".to_string(),
        state: "Texas".to_string(),
        state_code: "TX".to_string(),
        latitude: lat,
        longitude: lng,
        service_types: vec!["Dead Horse Removal".to_string()],
        species: vec!["Horse".to_string()],
        service_radius_miles: 25,
        description: String::new(),
        status: VendorStatus::Active,
        emergency_service: false,
        insurance_certified: false,
        business_hours: String::new(),
        featured_image: None,
        created_at: stamp,
        updated_at: stamp,
    }
}

/// A vendor with no coordinates in the given city/state.
pub(crate) fn vendor_in(id: &str, city: &str, state_code: &str) -> Vendor {
    Vendor {
        city: city.to_string(),
        state_code: state_code.to_string(),
        ..vendor_at(id, None, None)
    }
}

pub(crate) fn with_services(mut vendor: Vendor, services: &[&str]) -> Vendor {
    vendor.service_types = services.iter().map(|s| (*s).to_string()).collect();
    vendor
}

pub(crate) fn with_radius(mut vendor: Vendor, miles: u32) -> Vendor {
    vendor.service_radius_miles = miles;
    vendor
}

/// Geocoder returning a canned answer and counting calls.
pub(crate) struct StubGeocoder {
    answer: Result<Option<GeocodeResult>, String>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    pub(crate) fn found(lat: f64, lng: f64) -> Self {
        Self::answering(Ok(Some(GeocodeResult {
            latitude: lat,
            longitude: lng,
            formatted_address: "1 Ranch Rd, Austin, TX 78701, USA".to_string(),
            city: Some("Austin".to_string()),
            state: Some("Texas".to_string()),
            state_code: Some("TX".to_string()),
            country: Some("United States".to_string()),
        })))
    }

    pub(crate) fn not_found() -> Self {
        Self::answering(Ok(None))
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self::answering(Err(message.to_string()))
    }

    fn answering(answer: Result<Option<GeocodeResult>, String>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Option<GeocodeResult>, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(BoxError::from)
    }

    async fn reverse_geocode(&self, point: GeoPoint) -> Result<Option<GeocodeResult>, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.answer.clone().map_err(BoxError::from)?;
        Ok(answer.map(|found| GeocodeResult {
            latitude: point.lat,
            longitude: point.lng,
            ..found
        }))
    }
}
