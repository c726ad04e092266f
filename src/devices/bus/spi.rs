//! SPI bus transport
//!
//! Register read = one transaction writing the register byte then clocking
//! in the payload with chip-select held. Writes go out as a single burst.
//! Chip-select is owned by the `SpiDevice` implementation.

use super::{BusKind, BusStatus, BusTransport};
use crate::platform::{PlatformError, Result};
use embedded_hal_async::spi::{Operation, SpiDevice};

/// SPI transport for a BNO08x strapped to SPI mode
pub struct SpiBus<SPI> {
    spi: SPI,
}

impl<SPI> SpiBus<SPI> {
    /// Wrap an `embedded-hal-async` SPI device (bus + chip-select)
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Release the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> BusTransport for SpiBus<SPI> {
    fn kind(&self) -> BusKind {
        BusKind::Spi
    }

    fn check(&self) -> BusStatus {
        // An SpiDevice can only be built from an initialized bus
        BusStatus::Ready
    }

    async fn init(&mut self) -> Result<()> {
        // Protocol selection is done by the PS0/PS1 strapping pins
        Ok(())
    }

    async fn read(&mut self, reg: u8, buf: &mut [u8]) -> Result<()> {
        let reg = [reg];
        self.spi
            .transaction(&mut [Operation::Write(&reg), Operation::Read(buf)])
            .await
            .map_err(|e| {
                crate::log_error!("SPI read of reg 0x{:02X} failed", reg[0]);
                PlatformError::from_spi(e)
            })
    }

    async fn write(&mut self, data: &[u8]) -> Result<()> {
        self.spi.write(data).await.map_err(|e| {
            crate::log_error!("SPI write of {} bytes failed", data.len());
            PlatformError::from_spi(e)
        })
    }
}
