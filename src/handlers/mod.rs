pub mod blog;
pub mod catalog;
pub mod common;
pub mod inventory;
pub mod pricing;
pub mod settings;
pub mod variations;

use crate::{
    db::DbPool,
    events::EventSender,
    services::{
        blog::BlogService, default_rates::DefaultRatesService, devices::DeviceService,
        inventory::InventoryService, locations::LocationService, pricing::Rates,
        repair_types::RepairTypeService,
    },
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub inventory: Arc<InventoryService>,
    pub default_rates: Arc<DefaultRatesService>,
    pub locations: Arc<LocationService>,
    pub devices: Arc<DeviceService>,
    pub repair_types: Arc<RepairTypeService>,
    pub blog: Arc<BlogService>,
}

impl AppServices {
    /// `fallback_rates` apply until default rates are stored in the database
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        fallback_rates: Rates,
    ) -> Self {
        Self {
            inventory: Arc::new(InventoryService::new(
                db_pool.clone(),
                event_sender.clone(),
                fallback_rates,
            )),
            default_rates: Arc::new(DefaultRatesService::new(
                db_pool.clone(),
                event_sender,
                fallback_rates,
            )),
            locations: Arc::new(LocationService::new(db_pool.clone())),
            devices: Arc::new(DeviceService::new(db_pool.clone())),
            repair_types: Arc::new(RepairTypeService::new(db_pool.clone())),
            blog: Arc::new(BlogService::new(db_pool)),
        }
    }
}
