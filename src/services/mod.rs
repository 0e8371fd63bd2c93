//! Business services. Each service owns a shared database handle and, where
//! it mutates state, the event sender.

pub mod blog;
pub mod default_rates;
pub mod devices;
pub mod inventory;
pub mod locations;
pub mod pricing;
pub mod repair_types;
pub mod users;
