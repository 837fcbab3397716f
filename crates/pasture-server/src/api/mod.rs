mod admin;
mod catalog;
mod map;
mod regions;
mod search;
mod submissions;
mod vendors;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use pasture_core::{
    paginate, AppConfig, DiscoveryEngine, Geocoder, LocationCatalog, RepositoryError, Vendor,
    VendorFilter, VendorRepository,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::map_provider::MapProvider;
use crate::middleware::{request_id, RequestId};

const MAX_PAGE_SIZE: usize = 100;

/// Radii and page size shared by the listing routes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoverySettings {
    pub search_radius_miles: f64,
    pub home_radius_miles: f64,
    pub page_size: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn VendorRepository>,
    pub geocoder: Arc<dyn Geocoder>,
    pub map_provider: Arc<MapProvider>,
    pub engine: DiscoveryEngine,
    pub catalog: LocationCatalog,
    pub settings: DiscoverySettings,
}

impl AppState {
    #[must_use]
    pub fn from_config(
        config: &AppConfig,
        repository: Arc<dyn VendorRepository>,
        geocoder: Arc<dyn Geocoder>,
        map_provider: Arc<MapProvider>,
    ) -> Self {
        Self {
            repository,
            geocoder,
            map_provider,
            engine: DiscoveryEngine::new(config.service_match),
            catalog: LocationCatalog::us(),
            settings: DiscoverySettings {
                search_radius_miles: config.search_radius_miles,
                home_radius_miles: config.home_radius_miles,
                page_size: config.page_size,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    /// Submitted field the error refers to, when there is one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// One page of a listing plus what the client needs to request the next.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
    pub total: usize,
    pub has_more: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                field: None,
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    #[must_use]
    pub fn with_field(mut self, field: Option<&str>) -> Self {
        self.error.field = field.map(ToOwned::to_owned);
        self
    }

    pub fn not_found(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "not_found", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "map_unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_page_size(requested: Option<usize>, default: usize) -> usize {
    requested.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

/// Slice out the one-based `page` of `items`. Pages past the end are empty.
pub(super) fn page_of<T: Clone + Serialize>(
    items: &[T],
    page: Option<usize>,
    page_size: usize,
) -> Page<T> {
    let paginator = paginate(items, page_size);
    let page = page.unwrap_or(1).max(1);
    Page {
        items: paginator.page(page - 1).to_vec(),
        page,
        page_size: paginator.page_size(),
        page_count: paginator.page_count(),
        total: paginator.total_items(),
        has_more: page < paginator.page_count(),
    }
}

pub(super) fn map_repository_error(request_id: String, error: &RepositoryError) -> ApiError {
    match error {
        RepositoryError::NotFound { entity, id } => {
            ApiError::not_found(request_id, format!("{entity} not found: {id}"))
        }
        RepositoryError::Backend(_) => {
            tracing::error!(error = %error, "repository query failed");
            ApiError::new(request_id, "internal_error", "repository query failed")
        }
    }
}

/// Vendors matching `filter`, with backend failures already mapped.
pub(super) async fn fetch_vendors(
    state: &AppState,
    request_id: &str,
    filter: VendorFilter,
) -> Result<Vec<Vendor>, ApiError> {
    state
        .repository
        .fetch(&filter)
        .await
        .map_err(|e| map_repository_error(request_id.to_owned(), &e))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/vendors", get(vendors::list_vendors))
        .route("/api/v1/vendors/{id}", get(vendors::get_vendor))
        .route("/api/v1/search/{location_slug}", get(search::search_location))
        .route("/api/v1/regions/{state}", get(regions::state_page))
        .route("/api/v1/regions/{state}/{segment}", get(regions::segment_page))
        .route(
            "/api/v1/regions/{state}/{city}/{service}",
            get(regions::city_service_page),
        )
        .route("/api/v1/catalog/states", get(catalog::list_states))
        .route("/api/v1/catalog/services", get(catalog::list_services))
        .route("/api/v1/catalog/species", get(catalog::list_species))
        .route("/api/v1/catalog/paths", get(catalog::list_paths))
        .route("/api/v1/map/config", get(map::map_config))
        .route("/api/v1/submissions", post(submissions::create_submission))
}

fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/admin/submissions",
            get(admin::list_pending_submissions),
        )
        .route(
            "/api/v1/admin/submissions/{id}/approve",
            post(admin::approve),
        )
        .route("/api/v1/admin/submissions/{id}/reject", post(admin::reject))
        .route("/api/v1/admin/vendors", get(admin::list_all_vendors))
        .route(
            "/api/v1/admin/vendors/{id}/status",
            put(admin::set_vendor_status),
        )
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(public_router())
        .merge(admin_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match state.repository.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: repository unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}
