//! Microphone (PDM) capture contract
//!
//! The PDM peripheral driver is board-specific and lives outside this
//! crate. The capture task only needs to configure it once, start the
//! stream and pull fixed-size PCM blocks straight into pool buffers.

use core::fmt;

use crate::parameters::AudioParams;

/// Microphone driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum AudioError {
    /// Stream parameters rejected by the driver
    InvalidConfig,
    /// Read before `start` or after `stop`
    NotRunning,
    /// No block arrived within the read timeout
    Timeout,
    /// Driver dropped samples
    Overrun,
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::InvalidConfig => write!(f, "Invalid microphone configuration"),
            AudioError::NotRunning => write!(f, "Microphone stream not running"),
            AudioError::Timeout => write!(f, "Microphone read timeout"),
            AudioError::Overrun => write!(f, "Microphone overrun"),
        }
    }
}

/// PCM block source
#[allow(async_fn_in_trait)]
pub trait AudioSource {
    /// Apply stream configuration (rate, width, PDM clock limits, gain)
    async fn configure(&mut self, params: &AudioParams) -> Result<(), AudioError>;

    /// Start streaming
    async fn start(&mut self) -> Result<(), AudioError>;

    /// Stop streaming
    async fn stop(&mut self) -> Result<(), AudioError>;

    /// Wait for the next filled block and copy it into `dst`
    ///
    /// Returns the number of bytes written. Implementations apply the
    /// configured read timeout.
    async fn read_block(&mut self, dst: &mut [u8]) -> Result<usize, AudioError>;
}
