//! Platform error types
//!
//! Bus, GPIO and ADC faults from the embedded-hal implementations are
//! mapped to these variants so upper layers never see HAL-specific types.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum PlatformError {
    /// I2C operation failed
    I2c(I2cError),
    /// SPI operation failed
    Spi(SpiError),
    /// GPIO operation failed
    Gpio(GpioError),
    /// ADC conversion failed
    Adc(AdcError),
    /// Peripheral reported not ready
    NotReady,
    /// Invalid configuration provided
    InvalidConfig,
}

/// I2C-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum I2cError {
    /// Bus error occurred
    BusError,
    /// No acknowledgment received
    Nack,
    /// Arbitration lost
    ArbitrationLost,
    /// Receiver overrun
    Overrun,
    /// Anything else the HAL reports
    Other,
}

/// SPI-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum SpiError {
    /// Transfer failed
    TransferFailed,
    /// Mode fault
    ModeFault,
    /// Overrun error
    Overrun,
    /// Chip-select fault
    ChipSelectFault,
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum GpioError {
    /// Line is not wired on this board
    NotWired,
    /// Edge interrupt could not be configured
    InterruptConfig,
}

/// ADC-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum AdcError {
    /// Conversion did not complete
    ConversionFailed,
    /// Channel setup failed
    ChannelSetup,
}

impl From<embedded_hal::i2c::ErrorKind> for I2cError {
    fn from(kind: embedded_hal::i2c::ErrorKind) -> Self {
        use embedded_hal::i2c::ErrorKind;
        match kind {
            ErrorKind::Bus => I2cError::BusError,
            ErrorKind::ArbitrationLoss => I2cError::ArbitrationLost,
            ErrorKind::NoAcknowledge(_) => I2cError::Nack,
            ErrorKind::Overrun => I2cError::Overrun,
            _ => I2cError::Other,
        }
    }
}

impl From<embedded_hal::spi::ErrorKind> for SpiError {
    fn from(kind: embedded_hal::spi::ErrorKind) -> Self {
        use embedded_hal::spi::ErrorKind;
        match kind {
            ErrorKind::Overrun => SpiError::Overrun,
            ErrorKind::ModeFault => SpiError::ModeFault,
            ErrorKind::ChipSelectFault => SpiError::ChipSelectFault,
            _ => SpiError::TransferFailed,
        }
    }
}

impl PlatformError {
    /// Map an `embedded-hal` I2C error
    pub fn from_i2c<E: embedded_hal::i2c::Error>(err: E) -> Self {
        PlatformError::I2c(err.kind().into())
    }

    /// Map an `embedded-hal` SPI error
    pub fn from_spi<E: embedded_hal::spi::Error>(err: E) -> Self {
        PlatformError::Spi(err.kind().into())
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::I2c(e) => write!(f, "I2C error: {:?}", e),
            PlatformError::Spi(e) => write!(f, "SPI error: {:?}", e),
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::Adc(e) => write!(f, "ADC error: {:?}", e),
            PlatformError::NotReady => write!(f, "Peripheral not ready"),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}
