use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use pasture_core::{GeoPoint, RadiusSearch, RankedVendor, Vendor, VendorFilter};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{
    fetch_vendors, map_repository_error, normalize_page_size, page_of, ApiError, ApiResponse,
    AppState, Page, ResponseMeta,
};

#[derive(Debug, Default, Deserialize)]
pub(super) struct VendorQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    /// Free-text service term matched against vendor labels.
    pub service: Option<String>,
    /// Comma-separated labels pushed down to the repository.
    pub service_types: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

fn split_service_types(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// GET /api/v1/vendors — the home listing.
///
/// With `lat` and `lng` this is a radius query (default: the home radius);
/// without them every active vendor is listed in repository order.
pub(super) async fn list_vendors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<VendorQuery>,
) -> Result<Json<ApiResponse<Page<RankedVendor>>>, ApiError> {
    let filter = VendorFilter::active()
        .with_service_types(split_service_types(query.service_types.as_deref()));
    let vendors = fetch_vendors(&state, &req_id.0, filter).await?;
    let term = query.service.unwrap_or_default();

    let ranked = match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => {
            let Some(center) = GeoPoint::checked(lat, lng) else {
                return Err(ApiError::new(
                    req_id.0,
                    "validation_error",
                    "lat and lng must be valid WGS84 coordinates",
                ));
            };
            let search = RadiusSearch::new(
                center,
                query.radius.unwrap_or(state.settings.home_radius_miles),
            )
            .with_service_term(term);
            state.engine.search(&vendors, &search)
        }
        (None, None) => {
            let listed: Vec<&Vendor> = if term.trim().is_empty() {
                vendors.iter().collect()
            } else {
                state.engine.filter_by_term(&vendors, &term)
            };
            listed
                .into_iter()
                .cloned()
                .map(RankedVendor::unranked)
                .collect()
        }
        _ => {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "lat and lng must be given together",
            ))
        }
    };

    let page_size = normalize_page_size(query.page_size, state.settings.page_size);
    Ok(Json(ApiResponse {
        data: page_of(&ranked, query.page, page_size),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/vendors/{id} — inactive and pending vendors are not public.
pub(super) async fn get_vendor(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vendor>>, ApiError> {
    let vendor = state
        .repository
        .fetch_by_id(&id)
        .await
        .map_err(|e| map_repository_error(req_id.0.clone(), &e))?
        .filter(Vendor::is_active)
        .ok_or_else(|| ApiError::not_found(req_id.0.clone(), format!("vendor not found: {id}")))?;

    Ok(Json(ApiResponse {
        data: vendor,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_service_types_drops_blanks() {
        assert_eq!(
            split_service_types(Some(" horse, ,cattle ")),
            vec!["horse".to_string(), "cattle".to_string()]
        );
        assert!(split_service_types(None).is_empty());
    }
}
