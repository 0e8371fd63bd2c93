use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Quantity of one variation held at one store location.
/// Unique per `(variation_id, location_id)`; `quantity` never goes negative.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = StockLevel)]
#[sea_orm(table_name = "stock_levels")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub variation_id: Uuid,
    pub location_id: Uuid,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub purchase_cost: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::inventory_variation::Entity",
        from = "Column::VariationId",
        to = "super::inventory_variation::Column::Id",
        on_delete = "Cascade"
    )]
    Variation,
    #[sea_orm(
        belongs_to = "super::store_location::Entity",
        from = "Column::LocationId",
        to = "super::store_location::Column::Id"
    )]
    StoreLocation,
}

impl Related<super::inventory_variation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variation.def()
    }
}

impl Related<super::store_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
