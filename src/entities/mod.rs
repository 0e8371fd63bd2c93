//! Database entities.
//!
//! Inventory: [`inventory_item`] has many [`inventory_variation`], which has
//! many [`stock_level`] rows (one per [`store_location`]).
//! Device hierarchy: [`device_brand`] → [`device_series`] → [`device_model`].

pub mod blog_post;
pub mod default_rates;
pub mod device_brand;
pub mod device_model;
pub mod device_series;
pub mod inventory_item;
pub mod inventory_variation;
pub mod repair_type;
pub mod stock_level;
pub mod store_location;
pub mod user;

pub use blog_post::Entity as BlogPost;
pub use default_rates::Entity as DefaultRates;
pub use device_brand::Entity as DeviceBrand;
pub use device_model::Entity as DeviceModel;
pub use device_series::Entity as DeviceSeries;
pub use inventory_item::Entity as InventoryItem;
pub use inventory_variation::Entity as InventoryVariation;
pub use repair_type::Entity as RepairType;
pub use stock_level::Entity as StockLevel;
pub use store_location::Entity as StoreLocation;
pub use user::Entity as User;
