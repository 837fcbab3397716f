//! State, city and service landing pages.
//!
//! Every segment is resolved through the catalog. A second segment is tried
//! as a service slug before a city slug; the catalog guarantees the two
//! never collide.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use pasture_core::{
    slugify, CityMatch, RegionQuery, SeoPageKind, Service, State as UsState, Vendor,
    VendorFilter,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{fetch_vendors, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RegionPage {
    pub kind: SeoPageKind,
    pub path: String,
    pub state: RegionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    pub local: Vec<Vendor>,
    pub nearby: Vec<Vendor>,
}

#[derive(Debug, Serialize)]
pub(super) struct RegionState {
    pub name: &'static str,
    pub code: &'static str,
    pub slug: String,
}

impl From<&UsState> for RegionState {
    fn from(state: &UsState) -> Self {
        Self {
            name: state.name,
            code: state.code,
            slug: state.slug(),
        }
    }
}

enum Target {
    State(&'static UsState),
    StateService(&'static UsState, &'static Service),
    City(CityMatch),
    CityService(CityMatch, &'static Service),
}

impl Target {
    fn kind(&self) -> SeoPageKind {
        match self {
            Target::State(_) => SeoPageKind::State,
            Target::StateService(..) => SeoPageKind::StateService,
            Target::City(_) => SeoPageKind::City,
            Target::CityService(..) => SeoPageKind::CityService,
        }
    }

    fn path(&self) -> String {
        match self {
            Target::State(state) => format!("/{}", state.slug()),
            Target::StateService(state, service) => format!("/{}/{}", state.slug(), service.slug),
            Target::City(city) => format!("/{}/{}", city.state.slug(), slugify(city.city)),
            Target::CityService(city, service) => format!(
                "/{}/{}/{}",
                city.state.slug(),
                slugify(city.city),
                service.slug
            ),
        }
    }
}

fn unresolved(req_id: String, path: &str) -> ApiError {
    tracing::warn!(path, "unresolvable region path");
    ApiError::not_found(req_id, format!("no landing page for {path}"))
}

async fn render(
    state: &AppState,
    req_id: String,
    target: Target,
) -> Result<Json<ApiResponse<RegionPage>>, ApiError> {
    let (region, region_state, city, service) = match &target {
        Target::State(s) => (RegionQuery::state(s), *s, None, None),
        Target::StateService(s, service) => (RegionQuery::state(s), *s, None, Some(*service)),
        Target::City(c) => (RegionQuery::city(c), c.state, Some(c.city), None),
        Target::CityService(c, service) => {
            (RegionQuery::city(c), c.state, Some(c.city), Some(*service))
        }
    };

    let vendors = fetch_vendors(state, &req_id, VendorFilter::active()).await?;
    let matches = state.engine.find_by_region(&vendors, &region, service);

    Ok(Json(ApiResponse {
        data: RegionPage {
            kind: target.kind(),
            path: target.path(),
            state: region_state.into(),
            city,
            service: service.copied(),
            local: matches.local,
            nearby: matches.nearby,
        },
        meta: ResponseMeta::new(req_id),
    }))
}

/// GET /api/v1/regions/{state}
pub(super) async fn state_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(state_slug): Path<String>,
) -> Result<Json<ApiResponse<RegionPage>>, ApiError> {
    let Some(us_state) = state.catalog.resolve_state(&state_slug) else {
        return Err(unresolved(req_id.0, &format!("/{state_slug}")));
    };
    render(&state, req_id.0, Target::State(us_state)).await
}

/// GET /api/v1/regions/{state}/{segment} — a state+service or a city page.
pub(super) async fn segment_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((state_slug, segment)): Path<(String, String)>,
) -> Result<Json<ApiResponse<RegionPage>>, ApiError> {
    let Some(us_state) = state.catalog.resolve_state(&state_slug) else {
        return Err(unresolved(req_id.0, &format!("/{state_slug}/{segment}")));
    };

    let target = if let Some(service) = state.catalog.resolve_service(&segment) {
        Target::StateService(us_state, service)
    } else if let Some(city) = state.catalog.resolve_city(&state_slug, &segment) {
        Target::City(city)
    } else {
        return Err(unresolved(req_id.0, &format!("/{state_slug}/{segment}")));
    };
    render(&state, req_id.0, target).await
}

/// GET /api/v1/regions/{state}/{city}/{service}
pub(super) async fn city_service_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((state_slug, city_slug, service_slug)): Path<(String, String, String)>,
) -> Result<Json<ApiResponse<RegionPage>>, ApiError> {
    let city = state.catalog.resolve_city(&state_slug, &city_slug);
    let service = state.catalog.resolve_service(&service_slug);
    let (Some(city), Some(service)) = (city, service) else {
        return Err(unresolved(
            req_id.0,
            &format!("/{state_slug}/{city_slug}/{service_slug}"),
        ));
    };
    render(&state, req_id.0, Target::CityService(city, service)).await
}
