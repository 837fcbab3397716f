//! Admin decisions on pending submissions.

use thiserror::Error;

use crate::repository::{RepositoryError, VendorRepository};
use crate::vendor::{NewVendor, Submission, SubmissionStatus};
use crate::CoreError;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("submission not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Transition(#[from] CoreError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Approve a pending submission and publish it as an active vendor.
/// Returns the new vendor id.
///
/// The status flip and the vendor insert happen in one repository call, so
/// a submission decided concurrently produces no vendor.
///
/// # Errors
///
/// [`ReviewError::NotFound`] for an unknown id, [`ReviewError::Transition`]
/// when the submission was already decided, and repository failures as-is.
pub async fn approve_submission(
    repository: &dyn VendorRepository,
    submission_id: &str,
) -> Result<String, ReviewError> {
    let submission = load(repository, submission_id).await?;
    submission
        .submission_status
        .transition(SubmissionStatus::Approved)?;

    let vendor = NewVendor::from_submission(&submission);
    let Some(vendor_id) = repository.approve_pending(submission_id, &vendor).await? else {
        return Err(lost_race(repository, submission_id, SubmissionStatus::Approved).await);
    };

    tracing::info!(submission_id, %vendor_id, "submission approved");
    Ok(vendor_id)
}

/// Reject a pending submission. Rejection is terminal.
///
/// # Errors
///
/// Same as [`approve_submission`].
pub async fn reject_submission(
    repository: &dyn VendorRepository,
    submission_id: &str,
) -> Result<(), ReviewError> {
    let submission = load(repository, submission_id).await?;
    let next = submission
        .submission_status
        .transition(SubmissionStatus::Rejected)?;
    if !repository.set_submission_status(submission_id, next).await? {
        return Err(lost_race(repository, submission_id, next).await);
    }

    tracing::info!(submission_id, "submission rejected");
    Ok(())
}

/// The submission was decided between the read and the write. Reports the
/// status it holds now.
async fn lost_race(
    repository: &dyn VendorRepository,
    submission_id: &str,
    to: SubmissionStatus,
) -> ReviewError {
    tracing::warn!(submission_id, %to, "submission decided concurrently");
    match load(repository, submission_id).await {
        Ok(current) => ReviewError::Transition(CoreError::InvalidTransition {
            from: current.submission_status,
            to,
        }),
        Err(err) => err,
    }
}

async fn load(
    repository: &dyn VendorRepository,
    submission_id: &str,
) -> Result<Submission, ReviewError> {
    repository
        .fetch_submission(submission_id)
        .await?
        .ok_or_else(|| ReviewError::NotFound(submission_id.to_string()))
}
