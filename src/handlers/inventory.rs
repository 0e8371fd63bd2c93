use super::common::{
    created_response, no_content_response, success_response, validate_input, PaginatedResponse,
};
use crate::{
    errors::ApiError,
    services::inventory::{
        CreateItemInput, ItemDetail, ItemQuery, ItemSummary, UpdateItemInput, VariationDetail,
        VariationInput,
    },
    ApiResponse, AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListItemsParams {
    /// Matches name, brand or category
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// Create the inventory router
pub fn inventory_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route(
            "/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/:id/duplicate", post(duplicate_item))
        .route("/:id/variations", post(add_variation))
}

/// List inventory items with aggregated stock
#[utoipa::path(
    get,
    path = "/api/v1/inventory",
    params(ListItemsParams),
    responses(
        (status = 200, description = "Inventory items returned", body = ApiResponse<PaginatedResponse<ItemSummary>>,
            headers(("X-Request-Id" = String, description = "Unique request id for tracing"))
        ),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(params): Query<ListItemsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let per_page = state.config.page_size(params.per_page);
    let page = state
        .services
        .inventory
        .list_items(ItemQuery {
            search: params.search,
            category: params.category,
            page: params.page.unwrap_or(1),
            per_page,
        })
        .await?;

    Ok(success_response(PaginatedResponse::new(
        page.items,
        page.total,
        page.page,
        page.per_page,
    )))
}

/// Create an item with its variations and stock levels
#[utoipa::path(
    post,
    path = "/api/v1/inventory",
    request_body = CreateItemInput,
    responses(
        (status = 201, description = "Inventory item created", body = ApiResponse<ItemDetail>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown store location", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already in use", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn create_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateItemInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let item = state.services.inventory.create_item(payload).await?;
    Ok(created_response(item))
}

#[utoipa::path(
    get,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Inventory item returned", body = ApiResponse<ItemDetail>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.services.inventory.get_item(id).await?;
    Ok(success_response(item))
}

/// Replace item fields and reconcile its variations
#[utoipa::path(
    put,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = UpdateItemInput,
    responses(
        (status = 200, description = "Inventory item updated", body = ApiResponse<ItemDetail>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already in use", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let item = state.services.inventory.update_item(id, payload).await?;
    Ok(success_response(item))
}

#[utoipa::path(
    delete,
    path = "/api/v1/inventory/{id}",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 204, description = "Inventory item deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.inventory.delete_item(id).await?;
    Ok(no_content_response())
}

/// Copy an item and its variations (stock is not copied)
#[utoipa::path(
    post,
    path = "/api/v1/inventory/{id}/duplicate",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    responses(
        (status = 201, description = "Copy created", body = ApiResponse<ItemDetail>),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn duplicate_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let copy = state.services.inventory.duplicate_item(id).await?;
    Ok(created_response(copy))
}

#[utoipa::path(
    post,
    path = "/api/v1/inventory/{id}/variations",
    params(("id" = Uuid, Path, description = "Inventory item ID")),
    request_body = VariationInput,
    responses(
        (status = 201, description = "Variation created", body = ApiResponse<VariationDetail>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item or location not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "SKU already in use", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn add_variation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VariationInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let variation = state.services.inventory.add_variation(id, payload).await?;
    Ok(created_response(variation))
}
