use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the only row this table ever holds
pub const SINGLETON_ID: i32 = 1;

/// System-wide fallback rates for variations that opt out of custom rates
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "default_rates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Tax percent
    #[sea_orm(column_type = "Decimal(Some((7, 3)))")]
    pub tax_rate: Decimal,
    /// Shipping percent of the raw price
    #[sea_orm(column_type = "Decimal(Some((7, 3)))")]
    pub shipping_rate: Decimal,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
