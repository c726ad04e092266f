//! Register/byte bus transport
//!
//! Uniform check/init/read/write contract over the two physical buses a
//! BNO08x (or companion motion chip) can sit on. The concrete bus is picked
//! when the device is constructed; drivers are generic over
//! [`BusTransport`] and never branch on bus kind.
//!
//! Errors are passed up verbatim; no retry happens at this layer.

mod i2c;
mod spi;

pub use i2c::I2cBus;
pub use spi::SpiBus;

use crate::platform::Result;

/// Bus readiness as reported by [`BusTransport::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum BusStatus {
    /// Endpoint configured and usable
    Ready,
    /// Endpoint missing or misconfigured
    NotReady,
}

/// Physical bus kind, for logging and diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum BusKind {
    /// Clocked full-duplex serial (SPI)
    Spi,
    /// Addressed multi-drop (I2C)
    I2c,
}

/// Register-level bus transport
#[allow(async_fn_in_trait)]
pub trait BusTransport {
    /// Which physical bus this transport drives
    fn kind(&self) -> BusKind;

    /// Check that the bus endpoint is usable
    fn check(&self) -> BusStatus;

    /// One-time bus setup before the first transfer
    async fn init(&mut self) -> Result<()>;

    /// Read `buf.len()` bytes starting at register `reg`
    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()>;

    /// Write `data` in a single transfer
    ///
    /// For register devices the first byte is the register address.
    async fn write(&mut self, data: &[u8]) -> Result<()>;
}

impl<T: BusTransport> BusTransport for &mut T {
    fn kind(&self) -> BusKind {
        T::kind(self)
    }

    fn check(&self) -> BusStatus {
        T::check(self)
    }

    async fn init(&mut self) -> Result<()> {
        T::init(self).await
    }

    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        T::read(self, reg, buf).await
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        T::write(self, data).await
    }
}
