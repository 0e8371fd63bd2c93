use crate::{
    entities::{default_rates, inventory_variation, DefaultRates, InventoryVariation},
    errors::ServiceError,
    events::{Event, EventSender},
    services::pricing::{self, PricingInput, Rates},
};
use chrono::{DateTime, Utc};
use metrics::counter;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;

/// Current default rates as seen by callers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DefaultRatesView {
    pub tax_rate: Decimal,
    pub shipping_rate: Decimal,
    /// False when no row exists yet and the configured fallback is in effect
    pub persisted: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DefaultRatesView {
    pub fn rates(&self) -> Rates {
        Rates {
            tax_rate: self.tax_rate,
            shipping_rate: self.shipping_rate,
        }
    }
}

impl From<default_rates::Model> for DefaultRatesView {
    fn from(model: default_rates::Model) -> Self {
        Self {
            tax_rate: model.tax_rate,
            shipping_rate: model.shipping_rate,
            persisted: true,
            updated_at: Some(model.updated_at),
        }
    }
}

/// Result of changing the default rates
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DefaultRatesUpdate {
    pub rates: DefaultRatesView,
    pub repriced_variations: u64,
}

/// Loads the stored rates, falling back to `fallback` when the row is absent
pub async fn current_rates<C: ConnectionTrait>(
    conn: &C,
    fallback: Rates,
) -> Result<Rates, ServiceError> {
    Ok(DefaultRates::find_by_id(default_rates::SINGLETON_ID)
        .one(conn)
        .await?
        .map(|row| Rates {
            tax_rate: row.tax_rate,
            shipping_rate: row.shipping_rate,
        })
        .unwrap_or(fallback))
}

/// Inserts or overwrites the single default-rates row
pub async fn upsert_rates<C: ConnectionTrait>(
    conn: &C,
    rates: Rates,
) -> Result<default_rates::Model, ServiceError> {
    let now = Utc::now();
    let existing = DefaultRates::find_by_id(default_rates::SINGLETON_ID)
        .one(conn)
        .await?;

    let model = match existing {
        Some(row) => {
            let mut active: default_rates::ActiveModel = row.into();
            active.tax_rate = Set(rates.tax_rate);
            active.shipping_rate = Set(rates.shipping_rate);
            active.updated_at = Set(now);
            active.update(conn).await?
        }
        None => {
            default_rates::ActiveModel {
                id: Set(default_rates::SINGLETON_ID),
                tax_rate: Set(rates.tax_rate),
                shipping_rate: Set(rates.shipping_rate),
                updated_at: Set(now),
            }
            .insert(conn)
            .await?
        }
    };
    Ok(model)
}

/// Re-derives stored prices for every variation priced from the default rates
pub async fn reprice_default_rate_variations<C: ConnectionTrait>(
    conn: &C,
    rates: Rates,
) -> Result<u64, ServiceError> {
    let variations = InventoryVariation::find()
        .filter(inventory_variation::Column::UseDefaultRates.eq(true))
        .all(conn)
        .await?;

    let mut repriced = 0u64;
    for variation in variations {
        let breakdown = pricing::derive(&PricingInput::from(&variation), &rates);
        pricing::check_breakdown(&breakdown).map_err(|e| match e {
            ServiceError::ValidationError(msg) => {
                ServiceError::ValidationError(format!("SKU '{}': {}", variation.sku, msg))
            }
            other => other,
        })?;
        let mut active: inventory_variation::ActiveModel = variation.into();
        active.cost = Set(breakdown.cost);
        active.total_cost = Set(breakdown.total_cost);
        active.profit = Set(breakdown.profit);
        active.selling_price = Set(breakdown.selling_price);
        active.updated_at = Set(Utc::now());
        active.update(conn).await?;
        repriced += 1;
    }
    Ok(repriced)
}

pub(crate) fn validate_rates(rates: &Rates) -> Result<(), ServiceError> {
    for (field, value) in [
        ("tax_rate", rates.tax_rate),
        ("shipping_rate", rates.shipping_rate),
    ] {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(ServiceError::ValidationError(format!(
                "{} must be between 0 and 100",
                field
            )));
        }
    }
    Ok(())
}

/// Reads and changes the system-wide default tax and shipping rates
#[derive(Clone)]
pub struct DefaultRatesService {
    db: Arc<DatabaseConnection>,
    event_sender: Arc<EventSender>,
    fallback: Rates,
}

impl DefaultRatesService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Arc<EventSender>, fallback: Rates) -> Self {
        Self {
            db,
            event_sender,
            fallback,
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<DefaultRatesView, ServiceError> {
        let row = DefaultRates::find_by_id(default_rates::SINGLETON_ID)
            .one(&*self.db)
            .await?;

        Ok(match row {
            Some(model) => model.into(),
            None => DefaultRatesView {
                tax_rate: self.fallback.tax_rate,
                shipping_rate: self.fallback.shipping_rate,
                persisted: false,
                updated_at: None,
            },
        })
    }

    /// Stores new rates and reprices dependent variations in one transaction
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        tax_rate: Decimal,
        shipping_rate: Decimal,
    ) -> Result<DefaultRatesUpdate, ServiceError> {
        let rates = Rates {
            tax_rate,
            shipping_rate,
        };
        validate_rates(&rates)?;

        let txn = self.db.begin().await?;
        let model = upsert_rates(&txn, rates).await?;
        let repriced_variations = reprice_default_rate_variations(&txn, rates).await?;
        txn.commit().await?;

        counter!("repair_shop.default_rates.updated", 1);
        info!(
            "Default rates updated; {} variations repriced",
            repriced_variations
        );

        self.event_sender
            .send_or_log(Event::DefaultRatesUpdated {
                tax_rate,
                shipping_rate,
                repriced_variations,
            })
            .await;

        Ok(DefaultRatesUpdate {
            rates: model.into(),
            repriced_variations,
        })
    }
}

impl From<&inventory_variation::Model> for PricingInput {
    fn from(v: &inventory_variation::Model) -> Self {
        Self {
            raw_price: v.raw_price,
            tax: v.tax,
            shipping: v.shipping,
            markup: v.markup,
            use_default_rates: v.use_default_rates,
        }
    }
}
