//! Firmware configuration
//!
//! Compile-time defaults for every subsystem, grouped by concern. Nothing is
//! persisted: each struct is built once at boot (usually via `Default`) and
//! handed to the task or driver that owns it.
//!
//! - `imu`: BNO08x timing, report rate and capture cadence
//! - `audio`: PDM microphone stream and buffer pool geometry
//! - `battery`: ADC front end, divider and sampling schedule
//! - `link`: transmit-side timing

pub mod audio;
pub mod battery;
pub mod imu;
pub mod link;

pub use audio::AudioParams;
pub use battery::BatteryParams;
pub use imu::ImuParams;
pub use link::LinkParams;
