//! Platform abstraction layer
//!
//! Error taxonomy shared by all drivers, RP2350 adapters for the embedded
//! target, and host mocks for unit tests. All chip-specific code lives here
//! or behind the `pico2_w` feature in device modules.

pub mod error;

// Platform implementations (feature-gated)
#[cfg(feature = "pico2_w")]
pub mod rp2350;

#[cfg(test)]
pub mod mock;

pub use error::{PlatformError, Result};
