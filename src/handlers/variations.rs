use super::common::{created_response, no_content_response, success_response, validate_input};
use crate::{
    entities::stock_level,
    errors::ApiError,
    services::inventory::{StockLevelDetail, VariationDetail, VariationInput},
    ApiResponse, AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetStockRequest {
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub purchase_cost: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdjustStockRequest {
    /// Units to add; negative removes stock
    pub delta: i32,
}

pub fn variations_router() -> Router<AppState> {
    Router::new()
        .route("/:id", put(update_variation).delete(delete_variation))
        .route("/:id/duplicate", post(duplicate_variation))
        .route("/:id/stock", get(list_stock))
        .route("/:id/stock/:location_id", put(set_stock))
        .route("/:id/stock/:location_id/adjust", post(adjust_stock))
}

#[utoipa::path(
    put,
    path = "/api/v1/variations/{id}",
    params(("id" = Uuid, Path, description = "Variation ID")),
    request_body = VariationInput,
    responses(
        (status = 200, description = "Variation updated", body = ApiResponse<VariationDetail>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "variations"
)]
pub async fn update_variation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VariationInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let variation = state.services.inventory.update_variation(id, payload).await?;
    Ok(success_response(variation))
}

#[utoipa::path(
    delete,
    path = "/api/v1/variations/{id}",
    params(("id" = Uuid, Path, description = "Variation ID")),
    responses(
        (status = 204, description = "Variation and its stock levels deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "variations"
)]
pub async fn delete_variation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.inventory.delete_variation(id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    post,
    path = "/api/v1/variations/{id}/duplicate",
    params(("id" = Uuid, Path, description = "Variation ID")),
    responses(
        (status = 201, description = "Copy created", body = ApiResponse<VariationDetail>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "variations"
)]
pub async fn duplicate_variation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let copy = state.services.inventory.duplicate_variation(id).await?;
    Ok(created_response(copy))
}

#[utoipa::path(
    get,
    path = "/api/v1/variations/{id}/stock",
    params(("id" = Uuid, Path, description = "Variation ID")),
    responses(
        (status = 200, description = "Stock per location", body = ApiResponse<Vec<StockLevelDetail>>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "variations"
)]
pub async fn list_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let levels = state.services.inventory.stock_levels(id).await?;
    Ok(success_response(levels))
}

/// Set the absolute quantity at a location
#[utoipa::path(
    put,
    path = "/api/v1/variations/{id}/stock/{location_id}",
    params(
        ("id" = Uuid, Path, description = "Variation ID"),
        ("location_id" = Uuid, Path, description = "Store location ID")
    ),
    request_body = SetStockRequest,
    responses(
        (status = 200, description = "Stock level stored", body = ApiResponse<stock_level::Model>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Variation or location not found", body = crate::errors::ErrorResponse)
    ),
    tag = "variations"
)]
pub async fn set_stock(
    State(state): State<AppState>,
    Path((id, location_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SetStockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let level = state
        .services
        .inventory
        .set_stock_level(id, location_id, payload.quantity, payload.purchase_cost)
        .await?;
    Ok(success_response(level))
}

/// Add or remove units at a location
#[utoipa::path(
    post,
    path = "/api/v1/variations/{id}/stock/{location_id}/adjust",
    params(
        ("id" = Uuid, Path, description = "Variation ID"),
        ("location_id" = Uuid, Path, description = "Store location ID")
    ),
    request_body = AdjustStockRequest,
    responses(
        (status = 200, description = "Stock adjusted", body = ApiResponse<stock_level::Model>),
        (status = 404, description = "Variation or location not found", body = crate::errors::ErrorResponse),
        (status = 422, description = "Adjustment would make stock negative", body = crate::errors::ErrorResponse)
    ),
    tag = "variations"
)]
pub async fn adjust_stock(
    State(state): State<AppState>,
    Path((id, location_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AdjustStockRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let level = state
        .services
        .inventory
        .adjust_stock(id, location_id, payload.delta)
        .await?;
    Ok(success_response(level))
}
