//! Public intake of prospective vendors.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use pasture_core::{IntakeError, SubmissionForm, SubmissionIntake};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{map_repository_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CreateSubmissionResponse {
    pub submission_id: String,
}

/// First `x-forwarded-for` hop, else `x-real-ip`, else `"unknown"`.
pub(super) fn submitter_ip(headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    header("x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| header("x-real-ip"))
        .unwrap_or("unknown")
        .to_string()
}

fn map_intake_error(req_id: String, error: &IntakeError) -> ApiError {
    match error {
        IntakeError::MissingField(_) | IntakeError::GeocodeNotFound { .. } => {
            ApiError::new(req_id, "validation_error", error.to_string()).with_field(error.field())
        }
        IntakeError::Geocoder(source) => {
            tracing::error!(error = %source, "geocoder unavailable during intake");
            ApiError::new(req_id, "internal_error", "address lookup failed")
        }
        IntakeError::Repository(e) => map_repository_error(req_id, e),
    }
}

/// POST /api/v1/submissions
pub(super) async fn create_submission(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Json(form): Json<SubmissionForm>,
) -> Result<(StatusCode, Json<ApiResponse<CreateSubmissionResponse>>), ApiError> {
    let ip = submitter_ip(&headers);
    let intake = SubmissionIntake::new(state.repository.as_ref(), state.geocoder.as_ref());
    let submission_id = intake
        .submit(form, &ip)
        .await
        .map_err(|e| map_intake_error(req_id.0.clone(), &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: CreateSubmissionResponse { submission_id },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
