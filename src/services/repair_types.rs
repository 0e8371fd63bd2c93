use crate::{
    entities::{repair_type, RepairType},
    errors::ServiceError,
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct RepairTypeService {
    db: Arc<DatabaseConnection>,
}

impl RepairTypeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// All repair types, alphabetically
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<repair_type::Model>, ServiceError> {
        Ok(RepairType::find()
            .order_by_asc(repair_type::Column::Name)
            .all(&*self.db)
            .await?)
    }
}
