//! Vendor listings and the submissions that become them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VendorStatus {
    Active,
    Pending,
    Inactive,
}

impl VendorStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VendorStatus::Active => "Active",
            VendorStatus::Pending => "Pending",
            VendorStatus::Inactive => "Inactive",
        }
    }
}

impl std::fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VendorStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(VendorStatus::Active),
            "pending" => Ok(VendorStatus::Pending),
            "inactive" => Ok(VendorStatus::Inactive),
            _ => Err(CoreError::InvalidVendorStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    Pending,
    Approved,
    Rejected,
}

impl SubmissionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "Pending",
            SubmissionStatus::Approved => "Approved",
            SubmissionStatus::Rejected => "Rejected",
        }
    }

    /// Move to `next`. Only `Pending` may change; `Approved` and `Rejected`
    /// are terminal.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] for any move out of a terminal
    /// state or back to `Pending`.
    pub fn transition(self, next: SubmissionStatus) -> Result<SubmissionStatus, CoreError> {
        match (self, next) {
            (SubmissionStatus::Pending, SubmissionStatus::Approved | SubmissionStatus::Rejected) => {
                Ok(next)
            }
            (from, to) => Err(CoreError::InvalidTransition { from, to }),
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "approved" => Ok(SubmissionStatus::Approved),
            "rejected" => Ok(SubmissionStatus::Rejected),
            _ => Err(CoreError::InvalidSubmissionStatus(s.to_string())),
        }
    }
}

/// A published service provider listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    /// Opaque repository-assigned identifier.
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    /// Full state name, e.g. `"Texas"`.
    pub state: String,
    /// Two-letter postal code, e.g. `"TX"`.
    pub state_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Free-form service labels as entered by the vendor.
    pub service_types: Vec<String>,
    pub species: Vec<String>,
    pub service_radius_miles: u32,
    pub description: String,
    pub status: VendorStatus,
    pub emergency_service: bool,
    pub insurance_certified: bool,
    pub business_hours: String,
    pub featured_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    /// Coordinates usable in a spatial query.
    ///
    /// Absent, non-finite, out-of-range, or zero values (an unset record is
    /// stored as `0`) all disqualify the vendor.
    #[must_use]
    pub fn coordinates(&self) -> Option<GeoPoint> {
        let (lat, lng) = (self.latitude?, self.longitude?);
        if lat == 0.0 || lng == 0.0 {
            return None;
        }
        GeoPoint::checked(lat, lng)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == VendorStatus::Active
    }
}

/// Fields for a vendor about to be created by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVendor {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub state_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub service_types: Vec<String>,
    pub species: Vec<String>,
    pub service_radius_miles: u32,
    pub description: String,
    pub status: VendorStatus,
    pub emergency_service: bool,
    pub insurance_certified: bool,
    pub business_hours: String,
    pub featured_image: Option<String>,
}

impl NewVendor {
    /// One-to-one promotion of an approved submission into an active listing.
    #[must_use]
    pub fn from_submission(submission: &Submission) -> Self {
        Self {
            name: submission.business_name.clone(),
            phone: submission.phone.clone(),
            email: submission.email.clone(),
            website: submission.website.clone(),
            address: submission.address.clone(),
            city: submission.city.clone().unwrap_or_default(),
            state: submission.state.clone().unwrap_or_default(),
            state_code: submission.state_code.clone().unwrap_or_default(),
            latitude: Some(submission.latitude),
            longitude: Some(submission.longitude),
            service_types: submission.services.clone(),
            species: submission.species.clone(),
            service_radius_miles: submission.service_radius_miles,
            description: submission.description.clone(),
            status: VendorStatus::Active,
            emergency_service: submission.emergency_service,
            insurance_certified: false,
            business_hours: submission.business_hours.clone(),
            featured_image: None,
        }
    }
}

/// A validated submission ready for persistence. Always created `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub business_name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub services: Vec<String>,
    pub species: Vec<String>,
    pub service_radius_miles: u32,
    pub description: String,
    pub website: Option<String>,
    pub emergency_service: bool,
    pub business_hours: String,
    pub submitter_ip: String,
}

/// A prospective vendor as stored for admin review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub business_name: String,
    pub contact_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub state_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub services: Vec<String>,
    pub species: Vec<String>,
    pub service_radius_miles: u32,
    pub description: String,
    pub website: Option<String>,
    pub emergency_service: bool,
    pub business_hours: String,
    pub submitter_ip: String,
    pub submission_status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    #[must_use]
    pub fn from_new(id: String, new: NewSubmission, submitted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            business_name: new.business_name,
            contact_name: new.contact_name,
            phone: new.phone,
            email: new.email,
            address: new.address,
            city: new.city,
            state: new.state,
            state_code: new.state_code,
            latitude: new.latitude,
            longitude: new.longitude,
            services: new.services,
            species: new.species,
            service_radius_miles: new.service_radius_miles,
            description: new.description,
            website: new.website,
            emergency_service: new.emergency_service,
            business_hours: new.business_hours,
            submitter_ip: new.submitter_ip,
            submission_status: SubmissionStatus::Pending,
            submitted_at,
        }
    }
}
