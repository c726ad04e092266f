//! Battery estimation
//!
//! Periodic ADC sample -> 8-slot moving average -> divider-corrected
//! voltage -> lookup-table state of charge, published as one atomic triple.
//!
//! - `filter`: moving-average filter
//! - `soc`: code/voltage conversions and the SoC lookup table
//! - `monitor`: shared state, `sample_now` and the periodic timer loop

mod filter;
mod monitor;
mod soc;

pub use filter::MovingAverage;
pub use monitor::{BatteryMonitor, BatteryReading, BATTERY_FILTER_DEPTH};
pub use soc::{adc_to_soc, adc_to_voltage, SocEntry, SOC_TABLE};

use core::fmt;

use crate::platform::PlatformError;

/// Battery subsystem errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum BatteryError {
    /// `init` has not completed
    NotInitialized,
    /// ADC read failed
    Adc(PlatformError),
}

impl fmt::Display for BatteryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatteryError::NotInitialized => write!(f, "Battery monitor not initialized"),
            BatteryError::Adc(e) => write!(f, "Battery ADC error: {}", e),
        }
    }
}

/// Single-channel battery sense ADC
#[allow(async_fn_in_trait)]
pub trait BatteryAdc {
    /// Configure the channel (gain, reference, acquisition time, oversampling)
    async fn setup(&mut self) -> Result<(), PlatformError>;

    /// One conversion; single-ended inputs may read slightly negative
    async fn read_raw(&mut self) -> Result<i16, PlatformError>;
}
