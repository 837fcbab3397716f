pub mod app_config;
pub mod catalog;
pub mod config;
pub mod discovery;
pub mod geo;
pub mod intake;
pub mod map;
pub mod memory;
pub mod repository;
pub mod review;
pub mod vendor;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    location_slug, slugify, CityMatch, LocationCatalog, SeoPage, SeoPageKind, Service, State,
    LIVESTOCK_SPECIES,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use discovery::{
    paginate, DiscoveryEngine, Paginator, RadiusSearch, RankedVendor, RegionMatches, RegionQuery,
    ServiceMatchMode, NEARBY_LIMIT,
};
pub use geo::{distance_miles, GeoBounds, GeoPoint, EARTH_RADIUS_MILES};
pub use intake::{
    normalize_service_radius, IntakeError, SubmissionForm, SubmissionIntake,
    DEFAULT_SERVICE_RADIUS_MILES,
};
pub use map::{plan_viewport, MapViewMode, Viewport, US_CENTER};
pub use memory::MemoryVendorRepository;
pub use repository::{
    BoxError, GeocodeResult, Geocoder, RepositoryError, VendorFilter, VendorRepository,
};
pub use review::{approve_submission, reject_submission, ReviewError};
pub use vendor::{NewSubmission, NewVendor, Submission, SubmissionStatus, Vendor, VendorStatus};

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid vendor status: {0}")]
    InvalidVendorStatus(String),
    #[error("invalid submission status: {0}")]
    InvalidSubmissionStatus(String),
    #[error("invalid service match mode: {0}")]
    InvalidServiceMatchMode(String),
    #[error("submission cannot move from {from} to {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },
}

/// Slug collisions that would make landing-page routes ambiguous.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate service slug: '{0}'")]
    DuplicateServiceSlug(String),
    #[error("duplicate state slug: '{0}'")]
    DuplicateStateSlug(String),
    #[error("duplicate city '{city}' in {state}")]
    DuplicateCity { state: String, city: String },
    #[error("city '{city}' in {state} collides with a service slug")]
    CityShadowsService { state: String, city: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
