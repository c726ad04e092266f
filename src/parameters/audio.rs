//! PDM microphone and audio buffer pool parameters

/// Samples per audio block (5.6 ms at 16 kHz)
pub const SAMPLES_PER_BLOCK: usize = 90;

/// Bytes per 16-bit PCM sample
pub const BYTES_PER_SAMPLE: usize = 2;

/// Mono capture
pub const CHANNELS: usize = 1;

/// Audio payload bytes per block
pub const AUDIO_BLOCK_SIZE: usize = SAMPLES_PER_BLOCK * BYTES_PER_SAMPLE * CHANNELS;

/// Number of slots in the audio buffer pool
pub const POOL_BLOCK_COUNT: usize = 32;

/// Microphone stream configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioParams {
    /// PCM sample rate in Hz
    pub sample_rate_hz: u32,
    /// PCM sample width in bits
    pub sample_bits: u8,
    /// Number of channels
    pub channels: u8,
    /// Minimum PDM clock in Hz supported by the microphone
    pub min_pdm_clk_hz: u32,
    /// Maximum PDM clock in Hz supported by the microphone
    pub max_pdm_clk_hz: u32,
    /// Minimum PDM clock duty cycle in percent
    pub min_pdm_duty: u8,
    /// Maximum PDM clock duty cycle in percent
    pub max_pdm_duty: u8,
    /// Block read timeout in milliseconds
    pub read_timeout_ms: u32,
    /// Use the maximum PDM gain
    pub max_gain: bool,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            sample_rate_hz: 16_000,
            sample_bits: 16,
            channels: CHANNELS as u8,
            min_pdm_clk_hz: 1_200_000,
            max_pdm_clk_hz: 3_200_000,
            min_pdm_duty: 40,
            max_pdm_duty: 60,
            read_timeout_ms: 500,
            max_gain: true,
        }
    }
}

impl AudioParams {
    /// Bytes per block for this stream
    pub fn block_size(&self) -> usize {
        SAMPLES_PER_BLOCK * usize::from(self.sample_bits / 8) * usize::from(self.channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_size_matches_const() {
        assert_eq!(AUDIO_BLOCK_SIZE, 180);
        assert_eq!(AudioParams::default().block_size(), AUDIO_BLOCK_SIZE);
    }
}
