//! A process-local [`VendorRepository`] for tests and demos.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::repository::{RepositoryError, VendorFilter, VendorRepository};
use crate::vendor::{
    NewSubmission, NewVendor, Submission, SubmissionStatus, Vendor, VendorStatus,
};

#[derive(Debug, Default)]
struct Tables {
    vendors: Vec<Vendor>,
    submissions: Vec<Submission>,
    next_id: u64,
}

impl Tables {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn insert_vendor(&mut self, vendor: &NewVendor) -> String {
        let id = self.next_id("vendor");
        let now = Utc::now();
        let vendor = vendor.clone();
        self.vendors.push(Vendor {
            id: id.clone(),
            name: vendor.name,
            phone: vendor.phone,
            email: vendor.email,
            website: vendor.website,
            address: vendor.address,
            city: vendor.city,
            state: vendor.state,
            state_code: vendor.state_code,
            latitude: vendor.latitude,
            longitude: vendor.longitude,
            service_types: vendor.service_types,
            species: vendor.species,
            service_radius_miles: vendor.service_radius_miles,
            description: vendor.description,
            status: vendor.status,
            emergency_service: vendor.emergency_service,
            insurance_certified: vendor.insurance_certified,
            business_hours: vendor.business_hours,
            featured_image: vendor.featured_image,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Flip a `Pending` submission to `status`; `false` if already decided.
    fn claim_pending(
        &mut self,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<bool, RepositoryError> {
        let submission = self
            .submissions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| RepositoryError::not_found("submission", id))?;
        if submission.submission_status != SubmissionStatus::Pending {
            return Ok(false);
        }
        submission.submission_status = status;
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct MemoryVendorRepository {
    tables: Mutex<Tables>,
}

impl MemoryVendorRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with existing vendors, keeping their ids.
    #[must_use]
    pub fn with_vendors(vendors: Vec<Vendor>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                vendors,
                ..Tables::default()
            }),
        }
    }

    /// Every stored submission regardless of status.
    pub fn submissions(&self) -> Vec<Submission> {
        self.lock().submissions.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl VendorRepository for MemoryVendorRepository {
    async fn fetch(&self, filter: &VendorFilter) -> Result<Vec<Vendor>, RepositoryError> {
        let mut vendors: Vec<Vendor> = self
            .lock()
            .vendors
            .iter()
            .filter(|vendor| filter.accepts(vendor))
            .cloned()
            .collect();
        vendors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(vendors)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Vendor>, RepositoryError> {
        Ok(self.lock().vendors.iter().find(|v| v.id == id).cloned())
    }

    async fn create_vendor(&self, vendor: &NewVendor) -> Result<String, RepositoryError> {
        Ok(self.lock().insert_vendor(vendor))
    }

    async fn set_vendor_status(
        &self,
        id: &str,
        status: VendorStatus,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let vendor = tables
            .vendors
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| RepositoryError::not_found("vendor", id))?;
        vendor.status = status;
        vendor.updated_at = Utc::now();
        Ok(())
    }

    async fn create_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<String, RepositoryError> {
        let mut tables = self.lock();
        let id = tables.next_id("submission");
        tables
            .submissions
            .push(Submission::from_new(id.clone(), submission.clone(), Utc::now()));
        Ok(id)
    }

    async fn fetch_submission(&self, id: &str) -> Result<Option<Submission>, RepositoryError> {
        Ok(self.lock().submissions.iter().find(|s| s.id == id).cloned())
    }

    async fn list_pending(&self) -> Result<Vec<Submission>, RepositoryError> {
        Ok(self
            .lock()
            .submissions
            .iter()
            .filter(|s| s.submission_status == SubmissionStatus::Pending)
            .cloned()
            .collect())
    }

    async fn set_submission_status(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<bool, RepositoryError> {
        self.lock().claim_pending(id, status)
    }

    async fn approve_pending(
        &self,
        id: &str,
        vendor: &NewVendor,
    ) -> Result<Option<String>, RepositoryError> {
        let mut tables = self.lock();
        if !tables.claim_pending(id, SubmissionStatus::Approved)? {
            return Ok(None);
        }
        Ok(Some(tables.insert_vendor(vendor)))
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
