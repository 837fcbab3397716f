//! [`VendorRepository`] backed by Postgres.

use async_trait::async_trait;
use pasture_core::{
    NewSubmission, NewVendor, RepositoryError, Submission, SubmissionStatus, Vendor,
    VendorFilter, VendorRepository, VendorStatus,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{submissions, vendors, DbError};

#[derive(Debug, Clone)]
pub struct PgVendorRepository {
    pool: PgPool,
}

impl PgVendorRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Tell an unknown submission apart from one that was already decided.
    async fn require_submission(&self, id: &str, uuid: Uuid) -> Result<(), RepositoryError> {
        match submissions::get_submission(&self.pool, uuid).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(RepositoryError::not_found("submission", id)),
            Err(err) => Err(backend(err)),
        }
    }
}

fn backend(err: impl Into<DbError>) -> RepositoryError {
    RepositoryError::backend(err.into())
}

/// Ids are UUIDs in storage; anything else cannot exist.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id.trim()).ok()
}

#[async_trait]
impl VendorRepository for PgVendorRepository {
    async fn fetch(&self, filter: &VendorFilter) -> Result<Vec<Vendor>, RepositoryError> {
        let rows = vendors::list_vendors(&self.pool, filter.status, &filter.service_types)
            .await
            .map_err(backend)?;
        rows.into_iter()
            .map(|row| Vendor::try_from(row).map_err(backend))
            .collect()
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Vendor>, RepositoryError> {
        let Some(uuid) = parse_id(id) else {
            return Ok(None);
        };
        vendors::get_vendor(&self.pool, uuid)
            .await
            .map_err(backend)?
            .map(|row| Vendor::try_from(row).map_err(backend))
            .transpose()
    }

    async fn create_vendor(&self, vendor: &NewVendor) -> Result<String, RepositoryError> {
        let id = vendors::insert_vendor(&self.pool, vendor)
            .await
            .map_err(backend)?;
        Ok(id.to_string())
    }

    async fn set_vendor_status(
        &self,
        id: &str,
        status: VendorStatus,
    ) -> Result<(), RepositoryError> {
        let uuid = parse_id(id).ok_or_else(|| RepositoryError::not_found("vendor", id))?;
        let updated = vendors::update_vendor_status(&self.pool, uuid, status)
            .await
            .map_err(backend)?;
        if updated == 0 {
            return Err(RepositoryError::not_found("vendor", id));
        }
        Ok(())
    }

    async fn create_submission(
        &self,
        submission: &NewSubmission,
    ) -> Result<String, RepositoryError> {
        let id = submissions::insert_submission(&self.pool, submission)
            .await
            .map_err(backend)?;
        Ok(id.to_string())
    }

    async fn fetch_submission(&self, id: &str) -> Result<Option<Submission>, RepositoryError> {
        let Some(uuid) = parse_id(id) else {
            return Ok(None);
        };
        submissions::get_submission(&self.pool, uuid)
            .await
            .map_err(backend)?
            .map(|row| Submission::try_from(row).map_err(backend))
            .transpose()
    }

    async fn list_pending(&self) -> Result<Vec<Submission>, RepositoryError> {
        let rows = submissions::list_pending_submissions(&self.pool)
            .await
            .map_err(backend)?;
        rows.into_iter()
            .map(|row| Submission::try_from(row).map_err(backend))
            .collect()
    }

    async fn set_submission_status(
        &self,
        id: &str,
        status: SubmissionStatus,
    ) -> Result<bool, RepositoryError> {
        let uuid = parse_id(id).ok_or_else(|| RepositoryError::not_found("submission", id))?;
        let updated = submissions::update_submission_status(&self.pool, uuid, status)
            .await
            .map_err(backend)?;
        if updated == 0 {
            self.require_submission(id, uuid).await?;
            return Ok(false);
        }
        Ok(true)
    }

    async fn approve_pending(
        &self,
        id: &str,
        vendor: &NewVendor,
    ) -> Result<Option<String>, RepositoryError> {
        let uuid = parse_id(id).ok_or_else(|| RepositoryError::not_found("submission", id))?;
        let created = submissions::approve_submission(&self.pool, uuid, vendor)
            .await
            .map_err(backend)?;
        match created {
            Some(vendor_id) => Ok(Some(vendor_id.to_string())),
            None => {
                self.require_submission(id, uuid).await?;
                tracing::debug!(submission_id = id, "submission already decided, approval skipped");
                Ok(None)
            }
        }
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        crate::health_check(&self.pool).await.map_err(backend)
    }
}
