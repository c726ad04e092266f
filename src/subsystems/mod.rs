//! Application subsystems built on the device drivers

pub mod battery_service;
pub mod pipeline;

pub use battery_service::{BatteryServiceUpdater, UpdaterStep};
