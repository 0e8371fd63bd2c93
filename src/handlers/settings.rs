use super::common::{success_response, validate_input};
use crate::{
    errors::ApiError,
    services::default_rates::{DefaultRatesUpdate, DefaultRatesView},
    ApiResponse, AppState,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

fn validate_percent(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percent_range"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateDefaultRatesRequest {
    /// Tax percent
    #[validate(custom = "validate_percent")]
    pub tax_rate: Decimal,
    /// Shipping percent of the raw price
    #[validate(custom = "validate_percent")]
    pub shipping_rate: Decimal,
}

pub fn settings_router() -> Router<AppState> {
    Router::new().route("/default-rates", get(get_default_rates).put(update_default_rates))
}

#[utoipa::path(
    get,
    path = "/api/v1/settings/default-rates",
    responses(
        (status = 200, description = "Current default rates", body = ApiResponse<DefaultRatesView>)
    ),
    tag = "settings"
)]
pub async fn get_default_rates(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rates = state.services.default_rates.get().await?;
    Ok(success_response(rates))
}

/// Change the default rates and reprice every variation that uses them
#[utoipa::path(
    put,
    path = "/api/v1/settings/default-rates",
    request_body = UpdateDefaultRatesRequest,
    responses(
        (status = 200, description = "Rates stored", body = ApiResponse<DefaultRatesUpdate>),
        (status = 400, description = "Rate outside 0..=100", body = crate::errors::ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn update_default_rates(
    State(state): State<AppState>,
    Json(payload): Json<UpdateDefaultRatesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let update = state
        .services
        .default_rates
        .update(payload.tax_rate, payload.shipping_rate)
        .await?;
    Ok(success_response(update))
}
