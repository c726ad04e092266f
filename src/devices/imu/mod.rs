//! IMU Drivers
//!
//! - `bno08x`: CEVA BNO08x sensor hub (SPI or I2C, SHTP) with the
//!   motion-interrupt trigger subsystem

pub mod bno08x;
