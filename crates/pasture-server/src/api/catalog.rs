use axum::{extract::State, Extension, Json};
use pasture_core::{slugify, SeoPage, Service, LIVESTOCK_SPECIES};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct StateItem {
    pub name: &'static str,
    pub code: &'static str,
    pub slug: String,
    pub cities: Vec<CityItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct CityItem {
    pub name: &'static str,
    pub slug: String,
}

pub(super) async fn list_states(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<StateItem>>> {
    let data = state
        .catalog
        .states()
        .iter()
        .map(|s| StateItem {
            name: s.name,
            code: s.code,
            slug: s.slug(),
            cities: s
                .major_cities
                .iter()
                .map(|&city| CityItem {
                    name: city,
                    slug: slugify(city),
                })
                .collect(),
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_services(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<&'static [Service]>> {
    Json(ApiResponse {
        data: state.catalog.services(),
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Species labels offered as hints on the submission form.
pub(super) async fn list_species(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<&'static [&'static str]>> {
    Json(ApiResponse {
        data: LIVESTOCK_SPECIES,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Every landing page with its kind, in sitemap order.
pub(super) async fn list_paths(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<SeoPage>>> {
    Json(ApiResponse {
        data: state.catalog.enumerate_pages(),
        meta: ResponseMeta::new(req_id.0),
    })
}
