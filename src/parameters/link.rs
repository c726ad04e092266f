//! Transmit-side timing parameters

/// Transmit loop configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkParams {
    /// Bounded wait for a motion record per frame, in microseconds
    pub motion_wait_us: u32,
    /// Battery Service level update period while connected, in milliseconds
    pub battery_update_interval_ms: u32,
}

impl Default for LinkParams {
    fn default() -> Self {
        Self {
            motion_wait_us: 50,
            battery_update_interval_ms: 30_000,
        }
    }
}
