//! Motion-interrupt register map
//!
//! Feature-event (INT1) and data-ready (INT2) configuration registers
//! reached over the same register bus as the hub. Feature registers are
//! paged: select the page through `FEAT_PAGE`, then write the 16-bit value
//! at the register address.

/// Interrupt status, 16-bit little-endian (feature events in the low byte)
pub const INT_STATUS_0: u8 = 0x1C;

/// Feature page select
pub const FEAT_PAGE: u8 = 0x2F;

/// INT1 pin I/O control
pub const INT1_IO_CTRL: u8 = 0x53;

/// INT2 pin I/O control
pub const INT2_IO_CTRL: u8 = 0x54;

/// INT1 feature interrupt mapping
pub const INT1_MAP_FEAT: u8 = 0x56;

/// Data interrupt mapping (both pins)
pub const INT_MAP_DATA: u8 = 0x58;

/// INTx_IO_CTRL: push-pull output enabled
pub const INT_IO_CTRL_OUTPUT_EN: u8 = 0x08;

/// INT_STATUS_0: any-motion detected
pub const INT_STATUS_ANY_MOTION: u16 = 0x0040;

/// INT1_MAP_FEAT: route any-motion to INT1
pub const INT_MAP_ANY_MOTION: u8 = 0x40;

/// INT_MAP_DATA: route data-ready to INT2
pub const INT_MAP_DATA_DRDY_INT2: u8 = 0x40;

/// ANYMO_2: any-motion enable bit
pub const ANYMO_2_ENABLE: u16 = 0x8000;

/// Paged 16-bit feature register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureReg {
    /// Feature page
    pub page: u8,
    /// Register address within the page
    pub addr: u8,
}

/// Any-motion config 1: threshold and output selection
pub const ANYMO_1: FeatureReg = FeatureReg {
    page: 1,
    addr: 0x3C,
};

/// Any-motion config 2: duration and enable bit
pub const ANYMO_2: FeatureReg = FeatureReg {
    page: 1,
    addr: 0x3E,
};

/// Any-motion detector settings written when the motion trigger is enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnyMotionConfig {
    /// ANYMO_1 value (threshold, axis selection)
    pub anymo_1: u16,
    /// ANYMO_2 value without the enable bit (duration)
    pub anymo_2: u16,
}

impl Default for AnyMotionConfig {
    fn default() -> Self {
        Self {
            // 83 mg threshold on all axes
            anymo_1: 0xE0AA,
            // 5 samples of duration
            anymo_2: 0x0005,
        }
    }
}
