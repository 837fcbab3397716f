//! Collaborator contracts: where vendors come from and how addresses become
//! coordinates. Implementations live in `pasture-db`, `pasture-geocode`, and
//! [`crate::memory`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::GeoPoint;
use crate::vendor::{
    NewSubmission, NewVendor, Submission, SubmissionStatus, Vendor, VendorStatus,
};

/// Type-erased failure from a storage or network backend.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Backend(BoxError),
}

impl RepositoryError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn backend(err: impl Into<BoxError>) -> Self {
        Self::Backend(err.into())
    }
}

/// Coarse filters the repository applies itself. Geography is never pushed
/// down; the discovery engine does all spatial refinement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VendorFilter {
    pub status: Option<VendorStatus>,
    /// Keep vendors with any label containing any of these, ignoring case.
    pub service_types: Vec<String>,
}

impl VendorFilter {
    #[must_use]
    pub fn active() -> Self {
        Self {
            status: Some(VendorStatus::Active),
            service_types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_service_types(mut self, service_types: Vec<String>) -> Self {
        self.service_types = service_types;
        self
    }

    /// In-process evaluation of the filter, mirroring what backends do in
    /// their queries.
    #[must_use]
    pub fn accepts(&self, vendor: &Vendor) -> bool {
        if self.status.is_some_and(|status| vendor.status != status) {
            return false;
        }
        if self.service_types.is_empty() {
            return true;
        }
        self.service_types.iter().any(|wanted| {
            let wanted = wanted.to_lowercase();
            vendor
                .service_types
                .iter()
                .any(|label| label.to_lowercase().contains(&wanted))
        })
    }
}

#[async_trait]
pub trait VendorRepository: Send + Sync {
    /// Vendors matching `filter`, ordered by name.
    async fn fetch(&self, filter: &VendorFilter) -> Result<Vec<Vendor>, RepositoryError>;
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Vendor>, RepositoryError>;
    async fn create_vendor(&self, vendor: &NewVendor) -> Result<String, RepositoryError>;
    async fn set_vendor_status(
        &self,
        id: &str,
        status: VendorStatus,
    ) -> Result<(), RepositoryError>;

    /// Persist a `Pending` submission and return its id.
    async fn create_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<String, RepositoryError>;
    async fn fetch_submission(&self, id: &str) -> Result<Option<Submission>, RepositoryError>;
    /// Pending submissions, oldest first.
    async fn list_pending(&self) -> Result<Vec<Submission>, RepositoryError>;
    /// Decide a `Pending` submission. Returns `false`, writing nothing, when
    /// the submission was already decided.
    async fn set_submission_status(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<bool, RepositoryError>;
    /// Mark a `Pending` submission `Approved` and create `vendor` as one
    /// unit of work. Returns `None`, writing nothing, when the submission was
    /// already decided.
    async fn approve_pending(
        &self,
        id: &str,
        vendor: &NewVendor,
    ) -> Result<Option<String>, RepositoryError>;

    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// A resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub country: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// `Ok(None)` when the address matches nothing.
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeResult>, BoxError>;
    async fn reverse_geocode(&self, point: GeoPoint) -> Result<Option<GeocodeResult>, BoxError>;
}
