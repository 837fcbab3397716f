use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use pasture_core::{GeoPoint, RankedVendor, VendorFilter};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{fetch_vendors, page_of, ApiError, ApiResponse, AppState, Page, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResults {
    /// Human-readable name recovered from the slug.
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub center: GeoPoint,
    pub radius_miles: f64,
    pub results: Page<RankedVendor>,
}

fn display_name(location_slug: &str) -> String {
    location_slug.replace('-', " ")
}

/// GET /api/v1/search/{location_slug} — vendors around a searched location.
pub(super) async fn search_location(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(location_slug): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let center = query
        .lat
        .zip(query.lng)
        .and_then(|(lat, lng)| GeoPoint::checked(lat, lng));
    let Some(center) = center else {
        tracing::warn!(%location_slug, "search without usable coordinates");
        return Err(ApiError::not_found(
            req_id.0,
            "search location has no usable coordinates",
        ));
    };

    let vendors = fetch_vendors(&state, &req_id.0, VendorFilter::active()).await?;
    let radius_miles = state.settings.search_radius_miles;
    let ranked = state.engine.find_by_radius(&vendors, center, radius_miles);

    Ok(Json(ApiResponse {
        data: SearchResults {
            location: display_name(&location_slug),
            address: query.address.filter(|a| !a.trim().is_empty()),
            center,
            radius_miles,
            results: page_of(&ranked, query.page, state.settings.page_size),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_restores_spaces() {
        assert_eq!(display_name("austin-tx-78701"), "austin tx 78701");
    }
}
