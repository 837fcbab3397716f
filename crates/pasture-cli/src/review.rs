use pasture_core::{
    approve_submission, reject_submission, ReviewError, VendorRepository, VendorStatus,
};

/// Print submissions awaiting review, oldest first.
///
/// # Errors
///
/// Returns an error if the repository cannot be read.
pub(crate) async fn run_pending(repository: &dyn VendorRepository) -> anyhow::Result<()> {
    let pending = repository.list_pending().await?;
    if pending.is_empty() {
        println!("No submissions awaiting review.");
        return Ok(());
    }

    println!(
        "{:<38} {:<19} {:<32} {:<24} SERVICES",
        "ID", "SUBMITTED", "BUSINESS", "LOCATION"
    );
    for submission in &pending {
        let location = match (&submission.city, &submission.state_code) {
            (Some(city), Some(code)) => format!("{city}, {code}"),
            (None, Some(code)) => code.clone(),
            _ => submission.address.clone(),
        };
        println!(
            "{:<38} {:<19} {:<32} {:<24} {}",
            submission.id,
            submission.submitted_at.format("%Y-%m-%d %H:%M"),
            submission.business_name,
            location,
            submission.services.join(", ")
        );
    }
    println!("{} pending", pending.len());
    Ok(())
}

fn describe(err: ReviewError) -> anyhow::Error {
    match err {
        ReviewError::NotFound(id) => anyhow::anyhow!("submission {id} not found"),
        other => anyhow::Error::new(other),
    }
}

/// Approve a submission and print the published vendor id.
///
/// # Errors
///
/// Returns an error for an unknown or already decided submission.
pub(crate) async fn run_approve(repository: &dyn VendorRepository, id: &str) -> anyhow::Result<()> {
    let vendor_id = approve_submission(repository, id).await.map_err(describe)?;
    println!("Approved submission {id}; published as vendor {vendor_id}.");
    Ok(())
}

/// Reject a submission.
///
/// # Errors
///
/// Returns an error for an unknown or already decided submission.
pub(crate) async fn run_reject(repository: &dyn VendorRepository, id: &str) -> anyhow::Result<()> {
    reject_submission(repository, id).await.map_err(describe)?;
    println!("Rejected submission {id}.");
    Ok(())
}

/// Change a vendor's listing status.
///
/// # Errors
///
/// Returns an error if the vendor does not exist or the update fails.
pub(crate) async fn run_vendor_status(
    repository: &dyn VendorRepository,
    id: &str,
    status: VendorStatus,
) -> anyhow::Result<()> {
    repository.set_vendor_status(id, status).await?;
    tracing::info!(vendor_id = id, %status, "vendor status updated");
    println!("Vendor {id} is now {status}.");
    Ok(())
}
