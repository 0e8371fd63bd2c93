//! Read-only reference data: store locations, device hierarchy, repair types.

use super::common::success_response;
use crate::{
    entities::{device_brand, device_model, device_series, repair_type, store_location},
    errors::ApiError,
    services::devices::BrandNode,
    ApiResponse, AppState,
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use uuid::Uuid;

pub fn locations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations))
        .route("/:id", get(get_location))
}

pub fn devices_router() -> Router<AppState> {
    Router::new()
        .route("/brands", get(list_brands))
        .route("/brands/:id/series", get(list_series))
        .route("/series/:id/models", get(list_models))
        .route("/tree", get(device_tree))
}

pub fn repair_types_router() -> Router<AppState> {
    Router::new().route("/", get(list_repair_types))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses((status = 200, description = "Store locations", body = ApiResponse<Vec<store_location::Model>>)),
    tag = "catalog"
)]
pub async fn list_locations(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.locations.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations/{id}",
    params(("id" = Uuid, Path, description = "Store location ID")),
    responses(
        (status = 200, description = "Store location", body = ApiResponse<store_location::Model>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.locations.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/devices/brands",
    responses((status = 200, description = "Device brands", body = ApiResponse<Vec<device_brand::Model>>)),
    tag = "catalog"
)]
pub async fn list_brands(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.devices.list_brands().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/devices/brands/{id}/series",
    params(("id" = Uuid, Path, description = "Device brand ID")),
    responses(
        (status = 200, description = "Series of the brand", body = ApiResponse<Vec<device_series::Model>>),
        (status = 404, description = "Brand not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_series(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.devices.list_series(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/devices/series/{id}/models",
    params(("id" = Uuid, Path, description = "Device series ID")),
    responses(
        (status = 200, description = "Models of the series", body = ApiResponse<Vec<device_model::Model>>),
        (status = 404, description = "Series not found", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_models(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.devices.list_models(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/devices/tree",
    responses((status = 200, description = "Brands with nested series and models", body = ApiResponse<Vec<BrandNode>>)),
    tag = "catalog"
)]
pub async fn device_tree(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.devices.tree().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/repair-types",
    responses((status = 200, description = "Repair type catalog", body = ApiResponse<Vec<repair_type::Model>>)),
    tag = "catalog"
)]
pub async fn list_repair_types(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.repair_types.list().await?))
}
