//! ADC code conversions: voltage and state of charge
//!
//! The SoC table is indexed by filtered ADC code rather than by voltage, so
//! interpolation stays in integer arithmetic.

use crate::parameters::BatteryParams;

/// One lookup-table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocEntry {
    /// Filtered 12-bit ADC code
    pub adc: u16,
    /// State of charge at that code (percent)
    pub soc: u8,
}

const fn row(adc: u16, soc: u8) -> SocEntry {
    SocEntry { adc, soc }
}

/// Code-to-SoC table, strictly decreasing in both columns
///
/// Placeholder curve for a 1S LiPo (4.2 V full, 3.0 V empty); replace with
/// characterized data per cell type.
pub const SOC_TABLE: [SocEntry; 13] = [
    row(557, 100),
    row(540, 95),
    row(525, 90),
    row(510, 80),
    row(495, 70),
    row(480, 60),
    row(465, 50),
    row(460, 40),
    row(445, 30),
    row(430, 20),
    row(420, 10),
    row(412, 5),
    row(408, 0),
];

/// Map a filtered ADC code to state of charge
///
/// Clamped to 100 at or above the first row and to 0 below the last row;
/// in between, linear interpolation with truncating integer division.
pub fn adc_to_soc(code: u16) -> u8 {
    let first = SOC_TABLE[0];
    let last = SOC_TABLE[SOC_TABLE.len() - 1];

    if code >= first.adc {
        return first.soc;
    }
    if code < last.adc {
        return 0;
    }

    for pair in SOC_TABLE.windows(2) {
        let (high, low) = (pair[0], pair[1]);
        if code >= low.adc {
            let span_adc = u32::from(high.adc - low.adc);
            let span_soc = u32::from(high.soc - low.soc);
            let offset = u32::from(code - low.adc);
            return low.soc + (offset * span_soc / span_adc) as u8;
        }
    }

    0
}

/// Convert a filtered ADC code to battery voltage
///
/// `code * Vref * gain_divisor / full_scale` gives the pin voltage; dividing
/// by the divider ratio gives the cell voltage.
pub fn adc_to_voltage(code: u16, params: &BatteryParams) -> f32 {
    let pin_voltage = f32::from(code) * params.reference_v * params.gain_divisor / params.full_scale();
    pin_voltage / params.divider_ratio()
}
