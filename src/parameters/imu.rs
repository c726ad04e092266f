//! BNO08x and IMU capture parameters

/// Report interval for every enabled sensor (500 Hz)
const DEFAULT_REPORT_INTERVAL_US: u32 = 2_000;

/// Total wait for H_INTN before a transfer gives up
const DEFAULT_READY_TIMEOUT_US: u32 = 50_000;

/// H_INTN poll granularity
const DEFAULT_READY_POLL_US: u32 = 5;

/// Reset low and post-release hold time
const DEFAULT_RESET_PULSE_MS: u32 = 3;

/// Wake line hold after the hub acknowledges
const DEFAULT_WAKE_SETTLE_US: u32 = 50;

/// Open + product-ID attempts before init fails
const DEFAULT_INIT_ATTEMPTS: u8 = 3;

/// Scheduling yield between capture iterations
const DEFAULT_CAPTURE_YIELD_US: u32 = 200;

/// BNO08x driver and IMU capture configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuParams {
    /// Report interval in microseconds for all enabled reports
    pub report_interval_us: u32,
    /// Ready-line timeout in microseconds
    pub ready_timeout_us: u32,
    /// Ready-line poll period in microseconds
    pub ready_poll_us: u32,
    /// Reset pulse width (and post-release hold) in milliseconds
    pub reset_pulse_ms: u32,
    /// Wake handshake settle time in microseconds
    pub wake_settle_us: u32,
    /// Hub open attempts during init
    pub init_attempts: u8,
    /// Yield between capture iterations in microseconds
    pub capture_yield_us: u32,
}

impl Default for ImuParams {
    fn default() -> Self {
        Self {
            report_interval_us: DEFAULT_REPORT_INTERVAL_US,
            ready_timeout_us: DEFAULT_READY_TIMEOUT_US,
            ready_poll_us: DEFAULT_READY_POLL_US,
            reset_pulse_ms: DEFAULT_RESET_PULSE_MS,
            wake_settle_us: DEFAULT_WAKE_SETTLE_US,
            init_attempts: DEFAULT_INIT_ATTEMPTS,
            capture_yield_us: DEFAULT_CAPTURE_YIELD_US,
        }
    }
}

impl ImuParams {
    /// Number of ready-line polls that fit in the timeout
    pub fn ready_poll_budget(&self) -> u32 {
        (self.ready_timeout_us / self.ready_poll_us.max(1)).max(1)
    }
}
