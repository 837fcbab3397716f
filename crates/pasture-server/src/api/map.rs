use axum::{
    extract::{Query, State},
    Extension, Json,
};
use pasture_core::{plan_viewport, GeoPoint, MapViewMode, VendorFilter, Viewport};
use serde::{Deserialize, Serialize};

use crate::map_provider::MapSettings;
use crate::middleware::RequestId;

use super::{fetch_vendors, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct MapQuery {
    pub view: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(super) struct MapConfig {
    pub settings: MapSettings,
    pub view: MapViewMode,
    pub viewport: Viewport,
    pub vendor_count: usize,
}

/// GET /api/v1/map/config — provider settings and the initial camera.
///
/// A local view around a searched point only plans over vendors within the
/// search radius; every other view plans over all active vendors.
pub(super) async fn map_config(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MapQuery>,
) -> Result<Json<ApiResponse<MapConfig>>, ApiError> {
    let view = match query.view.as_deref() {
        None => MapViewMode::default(),
        Some(raw) => raw
            .parse::<MapViewMode>()
            .map_err(|reason| ApiError::new(req_id.0.clone(), "bad_request", reason))?,
    };

    let settings = state.map_provider.ready().await.map_err(|e| {
        ApiError::new(req_id.0.clone(), "map_unavailable", e.to_string())
    })?;

    let searched = query
        .lat
        .zip(query.lng)
        .and_then(|(lat, lng)| GeoPoint::checked(lat, lng));
    let vendors = fetch_vendors(&state, &req_id.0, VendorFilter::active()).await?;
    let shown: Vec<_> = match (view, searched) {
        (MapViewMode::Local, Some(center)) => state
            .engine
            .find_by_radius(&vendors, center, state.settings.search_radius_miles)
            .into_iter()
            .map(|ranked| ranked.vendor)
            .collect(),
        _ => vendors,
    };

    Ok(Json(ApiResponse {
        data: MapConfig {
            settings: settings.clone(),
            view,
            viewport: plan_viewport(view, searched, &shown),
            vendor_count: shown.len(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
