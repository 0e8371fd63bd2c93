//! Derived-price arithmetic for inventory variations.
//!
//! ```text
//! cost          = raw + raw * tax% + shipping
//! total_cost    = cost + cost * markup%
//! profit        = total_cost - cost
//! selling_price = total_cost
//! ```
//!
//! Everything here is pure; callers load the current default rates and
//! persist the resulting [`PriceBreakdown`].

use crate::errors::ServiceError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest amount a `Decimal(12, 2)` money column can hold
pub fn max_amount() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}
/// Tax percent ceiling
pub const MAX_TAX_PERCENT: Decimal = Decimal::ONE_HUNDRED;
/// Markup percent ceiling
pub const MAX_MARKUP_PERCENT: Decimal = Decimal::ONE_THOUSAND;
/// Decimal places stored for money columns
pub const MONEY_SCALE: u32 = 2;
/// Decimal places stored for percent columns
pub const PERCENT_SCALE: u32 = 3;

/// Pricing inputs carried by a variation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricingInput {
    pub raw_price: Decimal,
    /// Tax percent
    #[serde(default)]
    pub tax: Decimal,
    /// Shipping amount
    #[serde(default)]
    pub shipping: Decimal,
    /// Markup percent
    #[serde(default)]
    pub markup: Decimal,
    #[serde(default)]
    pub use_default_rates: bool,
}

/// System-wide rates applied to variations with `use_default_rates`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Rates {
    /// Tax percent
    pub tax_rate: Decimal,
    /// Shipping percent of the raw price
    pub shipping_rate: Decimal,
}

/// Tax percent and shipping amount actually used for a derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveInputs {
    pub tax_percent: Decimal,
    pub shipping_amount: Decimal,
}

/// Derived prices, each rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceBreakdown {
    pub cost: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    pub selling_price: Decimal,
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn percent_of(amount: Decimal, percent: Decimal) -> Decimal {
    amount * percent / Decimal::ONE_HUNDRED
}

/// Resolves which tax percent and shipping amount apply to `input`
pub fn effective_inputs(input: &PricingInput, defaults: &Rates) -> EffectiveInputs {
    if input.use_default_rates {
        EffectiveInputs {
            tax_percent: defaults.tax_rate,
            shipping_amount: round_money(percent_of(input.raw_price, defaults.shipping_rate)),
        }
    } else {
        EffectiveInputs {
            tax_percent: input.tax,
            shipping_amount: input.shipping,
        }
    }
}

/// Computes the derived prices for `input`.
///
/// `total_cost` is computed from the already rounded `cost`, so
/// `profit + cost == total_cost` holds exactly on the stored values.
pub fn derive(input: &PricingInput, defaults: &Rates) -> PriceBreakdown {
    let effective = effective_inputs(input, defaults);

    let cost = round_money(
        input.raw_price + percent_of(input.raw_price, effective.tax_percent)
            + effective.shipping_amount,
    );
    let total_cost = round_money(cost + percent_of(cost, input.markup));

    PriceBreakdown {
        cost,
        total_cost,
        profit: total_cost - cost,
        selling_price: total_cost,
    }
}

fn check_field(
    field: &str,
    value: Decimal,
    max: Decimal,
    scale: u32,
    errors: &mut Vec<String>,
) {
    if value.is_sign_negative() && !value.is_zero() {
        errors.push(format!("{} must not be negative", field));
    } else if value > max {
        errors.push(format!("{} must not exceed {}", field, max));
    } else if value.normalize().scale() > scale {
        errors.push(format!(
            "{} must have at most {} decimal places",
            field, scale
        ));
    }
}

fn into_result(errors: Vec<String>) -> Result<(), ServiceError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::ValidationError(errors.join("; ")))
    }
}

/// Rejects a negative amount, one above [`max_amount`] or one with sub-cent digits
pub fn validate_amount(field: &str, value: Decimal) -> Result<(), ServiceError> {
    let mut errors = Vec::new();
    check_field(field, value, max_amount(), MONEY_SCALE, &mut errors);
    into_result(errors)
}

/// Rejects negative, out-of-range or over-precise pricing inputs
pub fn validate(input: &PricingInput) -> Result<(), ServiceError> {
    let mut errors = Vec::new();
    check_field("raw_price", input.raw_price, max_amount(), MONEY_SCALE, &mut errors);
    check_field("tax", input.tax, MAX_TAX_PERCENT, PERCENT_SCALE, &mut errors);
    check_field("shipping", input.shipping, max_amount(), MONEY_SCALE, &mut errors);
    check_field("markup", input.markup, MAX_MARKUP_PERCENT, PERCENT_SCALE, &mut errors);
    into_result(errors)
}

/// Rejects derived prices that do not fit the money columns
pub fn check_breakdown(breakdown: &PriceBreakdown) -> Result<(), ServiceError> {
    let limit = max_amount();
    let mut errors = Vec::new();
    for (field, value) in [
        ("cost", breakdown.cost),
        ("total_cost", breakdown.total_cost),
        ("profit", breakdown.profit),
        ("selling_price", breakdown.selling_price),
    ] {
        if value > limit {
            errors.push(format!("derived {} {} exceeds {}", field, value, limit));
        }
    }
    into_result(errors)
}

/// Validates `input`, derives its prices and checks they can be stored
pub fn price(input: &PricingInput, defaults: &Rates) -> Result<PriceBreakdown, ServiceError> {
    validate(input)?;
    let breakdown = derive(input, defaults);
    check_breakdown(&breakdown)?;
    Ok(breakdown)
}
