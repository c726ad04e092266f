//! Battery Monitoring Parameters
//!
//! ADC front end and divider of the single-cell LiPo sense circuit:
//!
//! ```text
//! VBAT ──[ R1 1.5 MΩ ]──┬── AIN2 (gain 1/6, 0.6 V internal reference)
//!                        │
//!                    [ R2 220 kΩ ]
//!                        │
//!                       GND
//! ```

/// Battery ADC and sampling schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryParams {
    /// ADC resolution in bits
    pub resolution_bits: u8,
    /// Hardware oversampling factor
    pub oversampling: u8,
    /// ADC acquisition time in microseconds
    pub acquisition_time_us: u16,
    /// Internal reference voltage (V)
    pub reference_v: f32,
    /// Input gain as reciprocal (gain 1/6 => 6)
    pub gain_divisor: f32,
    /// Upper divider resistor (ohms)
    pub divider_r1_ohms: f32,
    /// Lower divider resistor (ohms)
    pub divider_r2_ohms: f32,
    /// Delay before the first periodic sample (ms)
    pub first_sample_delay_ms: u32,
    /// Periodic sampling interval (ms)
    pub sample_interval_ms: u32,
    /// Fully charged cell voltage (V), informational
    pub full_voltage: f32,
    /// Empty cell voltage (V), informational
    pub empty_voltage: f32,
}

impl Default for BatteryParams {
    fn default() -> Self {
        Self {
            resolution_bits: 12,
            oversampling: 4,
            acquisition_time_us: 40,
            reference_v: 0.6,
            gain_divisor: 6.0,
            divider_r1_ohms: 1_500_000.0,
            divider_r2_ohms: 220_000.0,
            first_sample_delay_ms: 1_000,
            sample_interval_ms: 30_000,
            full_voltage: 4.2,
            empty_voltage: 3.0,
        }
    }
}

impl BatteryParams {
    /// Full-scale ADC code (4095 for 12-bit)
    pub fn full_scale(&self) -> f32 {
        ((1u32 << self.resolution_bits) - 1) as f32
    }

    /// Divider ratio Vadc / Vbat
    pub fn divider_ratio(&self) -> f32 {
        self.divider_r2_ohms / (self.divider_r1_ohms + self.divider_r2_ohms)
    }
}
