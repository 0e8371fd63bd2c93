use super::common::success_response;
use crate::{
    errors::ApiError,
    services::pricing::{self, PriceBreakdown, PricingInput},
    ApiResponse, AppState,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct PricingPreview {
    /// Tax percent that was applied
    pub tax_percent: Decimal,
    /// Shipping amount that was applied
    pub shipping_amount: Decimal,
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
}

pub fn pricing_router() -> Router<AppState> {
    Router::new().route("/preview", post(preview))
}

/// Derive prices for unsaved inputs using the current default rates
#[utoipa::path(
    post,
    path = "/api/v1/pricing/preview",
    request_body = PricingInput,
    responses(
        (status = 200, description = "Derived prices", body = ApiResponse<PricingPreview>),
        (status = 400, description = "Negative or out-of-range input", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn preview(
    State(state): State<AppState>,
    Json(input): Json<PricingInput>,
) -> Result<impl IntoResponse, ApiError> {
    let rates = state.services.default_rates.get().await?.rates();
    let breakdown = pricing::price(&input, &rates)?;
    let effective = pricing::effective_inputs(&input, &rates);

    Ok(success_response(PricingPreview {
        tax_percent: effective.tax_percent,
        shipping_amount: effective.shipping_amount,
        breakdown,
    }))
}
