//! Device drivers
//!
//! ## Modules
//!
//! - `audio`: PDM microphone contract
//! - `battery`: battery ADC, filter, SoC table and monitor
//! - `bus`: SPI/I2C register transport
//! - `imu`: BNO08x sensor hub driver and its trigger subsystem
//! - `traits`: sensor API shared by drivers and the capture pipeline

pub mod audio;
pub mod battery;
pub mod bus;
pub mod imu;
pub mod traits;
