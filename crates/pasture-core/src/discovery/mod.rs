//! The single filtering and ranking procedure behind every listing: the home
//! map, the search page, and the state/city/service landing pages.
//!
//! Everything here is synchronous over vendors the caller already fetched.
//! Records with unusable data (no coordinates, no service labels) are
//! skipped, never reported as errors.

mod matching;
mod pagination;

use std::cmp::Ordering;

use serde::Serialize;

use crate::catalog::{CityMatch, Service, State};
use crate::geo::GeoPoint;
use crate::vendor::Vendor;

pub use matching::ServiceMatchMode;
pub use pagination::{paginate, Paginator};

/// Most "nearby" vendors a region page shows alongside local ones.
pub const NEARBY_LIMIT: usize = 3;

/// A vendor with the distance that ranked it, when the query had a center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVendor {
    #[serde(flatten)]
    pub vendor: Vendor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
}

impl RankedVendor {
    #[must_use]
    pub fn unranked(vendor: Vendor) -> Self {
        Self {
            vendor,
            distance_miles: None,
        }
    }
}

/// A point-and-radius query with an optional free-text service term.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusSearch {
    pub center: GeoPoint,
    pub radius_miles: f64,
    pub service_term: Option<String>,
}

impl RadiusSearch {
    #[must_use]
    pub fn new(center: GeoPoint, radius_miles: f64) -> Self {
        Self {
            center,
            radius_miles,
            service_term: None,
        }
    }

    /// Surrounding whitespace is dropped; a blank term means no term.
    #[must_use]
    pub fn with_service_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let trimmed = term.trim();
        self.service_term = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }
}

/// A state, optionally narrowed to one city, matched on vendor text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionQuery {
    pub state_code: String,
    pub city: Option<String>,
}

impl RegionQuery {
    #[must_use]
    pub fn state(state: &State) -> Self {
        Self {
            state_code: state.code.to_string(),
            city: None,
        }
    }

    #[must_use]
    pub fn city(city: &CityMatch) -> Self {
        Self {
            state_code: city.state.code.to_string(),
            city: Some(city.city.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RegionMatches {
    pub local: Vec<Vendor>,
    pub nearby: Vec<Vendor>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveryEngine {
    match_mode: ServiceMatchMode,
}

impl DiscoveryEngine {
    #[must_use]
    pub fn new(match_mode: ServiceMatchMode) -> Self {
        Self { match_mode }
    }

    #[must_use]
    pub fn match_mode(&self) -> ServiceMatchMode {
        self.match_mode
    }

    /// Vendors within reach of `center`, nearest first.
    ///
    /// A vendor is kept when its distance is within the smaller of
    /// `radius_miles` and its own service radius (a zero service radius
    /// imposes no extra limit). Equal distances are ordered by id so pages
    /// stay stable between requests. A non-positive or non-finite radius, or
    /// an invalid center, yields nothing.
    #[must_use]
    pub fn find_by_radius(
        &self,
        vendors: &[Vendor],
        center: GeoPoint,
        radius_miles: f64,
    ) -> Vec<RankedVendor> {
        if !radius_miles.is_finite() || radius_miles <= 0.0 || !center.is_valid() {
            return Vec::new();
        }

        let mut ranked: Vec<RankedVendor> = vendors
            .iter()
            .filter_map(|vendor| {
                let point = vendor.coordinates()?;
                let distance = center.distance_to(&point);
                (distance <= effective_radius(vendor, radius_miles)).then(|| RankedVendor {
                    vendor: vendor.clone(),
                    distance_miles: Some(distance),
                })
            })
            .collect();

        ranked.sort_by(compare_ranked);
        tracing::debug!(
            candidates = vendors.len(),
            matched = ranked.len(),
            radius_miles,
            "radius query ranked vendors"
        );
        ranked
    }

    /// A radius query, first narrowed by the optional service term.
    #[must_use]
    pub fn search(&self, vendors: &[Vendor], query: &RadiusSearch) -> Vec<RankedVendor> {
        match query.service_term.as_deref() {
            Some(term) => {
                let narrowed: Vec<Vendor> = self
                    .filter_by_term(vendors, term)
                    .into_iter()
                    .cloned()
                    .collect();
                self.find_by_radius(&narrowed, query.center, query.radius_miles)
            }
            None => self.find_by_radius(vendors, query.center, query.radius_miles),
        }
    }

    /// Split a region's vendors into those in the requested city and up to
    /// [`NEARBY_LIMIT`] others from the same state, both in input order.
    /// Without a city every state vendor is local and `nearby` is empty.
    #[must_use]
    pub fn find_by_region(
        &self,
        vendors: &[Vendor],
        region: &RegionQuery,
        service: Option<&Service>,
    ) -> RegionMatches {
        let city = region.city.as_deref().map(str::to_lowercase);
        let mut matches = RegionMatches::default();

        let in_state = vendors.iter().filter(|vendor| {
            vendor.state_code.eq_ignore_ascii_case(&region.state_code)
                && service.is_none_or(|service| {
                    self.match_mode
                        .matches_service(&vendor.service_types, service)
                })
        });

        for vendor in in_state {
            match &city {
                None => matches.local.push(vendor.clone()),
                Some(city) if vendor.city.to_lowercase() == *city => {
                    matches.local.push(vendor.clone());
                }
                Some(_) => {
                    if matches.nearby.len() < NEARBY_LIMIT {
                        matches.nearby.push(vendor.clone());
                    }
                }
            }
        }

        tracing::debug!(
            state_code = %region.state_code,
            city = region.city.as_deref().unwrap_or("-"),
            local = matches.local.len(),
            nearby = matches.nearby.len(),
            "region query matched vendors"
        );
        matches
    }

    /// Vendors carrying a label that matches a catalog service.
    #[must_use]
    pub fn filter_by_service<'v>(&self, vendors: &'v [Vendor], service: &Service) -> Vec<&'v Vendor> {
        vendors
            .iter()
            .filter(|vendor| self.match_mode.matches_service(&vendor.service_types, service))
            .collect()
    }

    /// Vendors carrying a label that matches a free-text term.
    #[must_use]
    pub fn filter_by_term<'v>(&self, vendors: &'v [Vendor], term: &str) -> Vec<&'v Vendor> {
        vendors
            .iter()
            .filter(|vendor| self.match_mode.matches_term(&vendor.service_types, term))
            .collect()
    }
}

fn effective_radius(vendor: &Vendor, radius_miles: f64) -> f64 {
    if vendor.service_radius_miles == 0 {
        radius_miles
    } else {
        radius_miles.min(f64::from(vendor.service_radius_miles))
    }
}

fn compare_ranked(a: &RankedVendor, b: &RankedVendor) -> Ordering {
    let da = a.distance_miles.unwrap_or(f64::INFINITY);
    let db = b.distance_miles.unwrap_or(f64::INFINITY);
    da.total_cmp(&db).then_with(|| a.vendor.id.cmp(&b.vendor.id))
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
