//! Review queue and vendor moderation.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use pasture_core::{
    approve_submission, reject_submission, ReviewError, Submission, SubmissionStatus, Vendor,
    VendorFilter, VendorStatus,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    fetch_vendors, map_repository_error, ApiError, ApiResponse, AppState, ResponseMeta,
};

#[derive(Debug, Serialize)]
pub(super) struct ReviewOutcome {
    pub submission_id: String,
    pub status: SubmissionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub(super) struct VendorStatusChange {
    pub id: String,
    pub status: VendorStatus,
}

fn map_review_error(req_id: String, error: &ReviewError) -> ApiError {
    match error {
        ReviewError::NotFound(id) => {
            ApiError::not_found(req_id, format!("submission not found: {id}"))
        }
        ReviewError::Transition(e) => ApiError::new(req_id, "bad_request", e.to_string()),
        ReviewError::Repository(e) => map_repository_error(req_id, e),
    }
}

pub(super) async fn list_pending_submissions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Submission>>>, ApiError> {
    let pending = state
        .repository
        .list_pending()
        .await
        .map_err(|e| map_repository_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: pending,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/submissions/{id}/approve
pub(super) async fn approve(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReviewOutcome>>, ApiError> {
    let vendor_id = approve_submission(state.repository.as_ref(), &id)
        .await
        .map_err(|e| map_review_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ReviewOutcome {
            submission_id: id,
            status: SubmissionStatus::Approved,
            vendor_id: Some(vendor_id),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// POST /api/v1/admin/submissions/{id}/reject
pub(super) async fn reject(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReviewOutcome>>, ApiError> {
    reject_submission(state.repository.as_ref(), &id)
        .await
        .map_err(|e| map_review_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ReviewOutcome {
            submission_id: id,
            status: SubmissionStatus::Rejected,
            vendor_id: None,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/admin/vendors — every vendor regardless of status.
pub(super) async fn list_all_vendors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<Vendor>>>, ApiError> {
    let vendors = fetch_vendors(&state, &req_id.0, VendorFilter::default()).await?;
    Ok(Json(ApiResponse {
        data: vendors,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/admin/vendors/{id}/status
pub(super) async fn set_vendor_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<VendorStatusChange>>, ApiError> {
    let status: VendorStatus = body.status.parse().map_err(|e: pasture_core::CoreError| {
        ApiError::new(req_id.0.clone(), "validation_error", e.to_string())
            .with_field(Some("status"))
    })?;

    state
        .repository
        .set_vendor_status(&id, status)
        .await
        .map_err(|e| map_repository_error(req_id.0.clone(), &e))?;
    tracing::info!(vendor_id = %id, %status, "vendor status changed");

    Ok(Json(ApiResponse {
        data: VendorStatusChange { id, status },
        meta: ResponseMeta::new(req_id.0),
    }))
}
