//! RP2350 (Pico 2 W) adapters
//!
//! Concrete implementations of the crate's hardware contracts on top of
//! `embassy-rp`. The BNO08x pin adapters live next to the pin traits in
//! [`crate::devices::imu::bno08x`].
//!
//! # Feature Gate
//!
//! Only available with the `pico2_w` feature:
//!
//! ```toml
//! [dependencies]
//! metabow = { version = "0.1", features = ["pico2_w"] }
//! ```

mod adc;

pub use adc::EmbassyBatteryAdc;
