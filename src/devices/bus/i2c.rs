//! I2C bus transport
//!
//! Register read = write-read with the start register. Writes are sent as
//! one transaction to the device address.

use super::{BusKind, BusStatus, BusTransport};
use crate::platform::{PlatformError, Result};
use embedded_hal_async::i2c::I2c;

/// Highest valid 7-bit address
const MAX_7BIT_ADDRESS: u8 = 0x7F;

/// I2C transport for a BNO08x on an addressed multi-drop bus
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cBus<I2C> {
    /// Default BNO08x I2C address (SA0 = high)
    pub const DEFAULT_ADDRESS: u8 = 0x4A;

    /// Alternate BNO08x I2C address (SA0 = low)
    pub const ALTERNATE_ADDRESS: u8 = 0x4B;

    /// Create a new I2C transport
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Get the I2C address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> BusTransport for I2cBus<I2C> {
    fn kind(&self) -> BusKind {
        BusKind::I2c
    }

    fn check(&self) -> BusStatus {
        if self.address <= MAX_7BIT_ADDRESS {
            BusStatus::Ready
        } else {
            BusStatus::NotReady
        }
    }

    async fn init(&mut self) -> Result<()> {
        // I2C is the power-on default protocol
        Ok(())
    }

    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(self.address, &[reg], buf)
            .await
            .map_err(PlatformError::from_i2c)
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.i2c
            .write(self.address, data)
            .await
            .map_err(PlatformError::from_i2c)
    }
}
