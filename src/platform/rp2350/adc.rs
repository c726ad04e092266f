//! Battery sense channel on the RP2350 ADC
//!
//! # Example
//!
//! ```ignore
//! use embassy_rp::adc::{Adc, Channel, Config, InterruptHandler};
//! use embassy_rp::gpio::Pull;
//! use metabow::platform::rp2350::EmbassyBatteryAdc;
//!
//! embassy_rp::bind_interrupts!(struct Irqs { ADC_IRQ_FIFO => InterruptHandler; });
//!
//! let adc = Adc::new(p.ADC, Irqs, Config::default());
//! let channel = Channel::new_pin(p.PIN_28, Pull::None);
//! let battery = BatteryMonitor::new(EmbassyBatteryAdc::new(adc, channel, 4), BatteryParams::default());
//! ```

use embassy_rp::adc::{Adc, Async, Channel};

use crate::devices::battery::BatteryAdc;
use crate::platform::{error::AdcError, PlatformError, Result};

/// One ADC channel with software oversampling
pub struct EmbassyBatteryAdc<'d> {
    adc: Adc<'d, Async>,
    channel: Channel<'d>,
    oversampling: u8,
}

impl<'d> EmbassyBatteryAdc<'d> {
    /// Wrap a configured ADC and channel; `oversampling` conversions are
    /// averaged per reading (0 is treated as 1)
    pub fn new(adc: Adc<'d, Async>, channel: Channel<'d>, oversampling: u8) -> Self {
        Self {
            adc,
            channel,
            oversampling: oversampling.max(1),
        }
    }
}

impl BatteryAdc for EmbassyBatteryAdc<'_> {
    async fn setup(&mut self) -> Result<()> {
        // Throwaway conversion confirms the channel answers
        self.adc.read(&mut self.channel).await.map_err(|_| {
            crate::log_error!("ADC channel did not answer");
            PlatformError::Adc(AdcError::ChannelSetup)
        })?;
        Ok(())
    }

    async fn read_raw(&mut self) -> Result<i16> {
        let mut sum: u32 = 0;
        for _ in 0..self.oversampling {
            let code = self
                .adc
                .read(&mut self.channel)
                .await
                .map_err(|_| PlatformError::Adc(AdcError::ConversionFailed))?;
            sum += u32::from(code);
        }
        Ok((sum / u32::from(self.oversampling)) as i16)
    }
}
