use crate::{
    entities::{device_brand, device_model, device_series, DeviceBrand, DeviceModel, DeviceSeries},
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeriesNode {
    pub id: Uuid,
    pub name: String,
    pub models: Vec<device_model::Model>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BrandNode {
    pub id: Uuid,
    pub name: String,
    pub series: Vec<SeriesNode>,
}

/// Brand → series → model taxonomy of repairable devices
#[derive(Clone)]
pub struct DeviceService {
    db: Arc<DatabaseConnection>,
}

impl DeviceService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_brands(&self) -> Result<Vec<device_brand::Model>, ServiceError> {
        Ok(DeviceBrand::find()
            .order_by_asc(device_brand::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn list_series(
        &self,
        brand_id: Uuid,
    ) -> Result<Vec<device_series::Model>, ServiceError> {
        DeviceBrand::find_by_id(brand_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Device brand {} not found", brand_id)))?;

        Ok(DeviceSeries::find()
            .filter(device_series::Column::BrandId.eq(brand_id))
            .order_by_asc(device_series::Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn list_models(
        &self,
        series_id: Uuid,
    ) -> Result<Vec<device_model::Model>, ServiceError> {
        DeviceSeries::find_by_id(series_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Device series {} not found", series_id))
            })?;

        Ok(DeviceModel::find()
            .filter(device_model::Column::SeriesId.eq(series_id))
            .order_by_asc(device_model::Column::Name)
            .all(&*self.db)
            .await?)
    }

    /// Whole hierarchy in three queries, nested in memory
    #[instrument(skip(self))]
    pub async fn tree(&self) -> Result<Vec<BrandNode>, ServiceError> {
        let brands = self.list_brands().await?;
        let series = DeviceSeries::find()
            .order_by_asc(device_series::Column::Name)
            .all(&*self.db)
            .await?;
        let models = DeviceModel::find()
            .order_by_asc(device_model::Column::Name)
            .all(&*self.db)
            .await?;

        let mut models_by_series: HashMap<Uuid, Vec<device_model::Model>> = HashMap::new();
        for model in models {
            models_by_series.entry(model.series_id).or_default().push(model);
        }

        let mut series_by_brand: HashMap<Uuid, Vec<SeriesNode>> = HashMap::new();
        for s in series {
            series_by_brand.entry(s.brand_id).or_default().push(SeriesNode {
                models: models_by_series.remove(&s.id).unwrap_or_default(),
                id: s.id,
                name: s.name,
            });
        }

        Ok(brands
            .into_iter()
            .map(|b| BrandNode {
                series: series_by_brand.remove(&b.id).unwrap_or_default(),
                id: b.id,
                name: b.name,
            })
            .collect())
    }
}
