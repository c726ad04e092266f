//! Time abstraction for platform-agnostic timestamps.
//!
//! The hub stack needs a monotonic microsecond clock (`now()` in the HAL
//! contract) and the battery/transmit loops need elapsed-time bookkeeping.
//! `TimeSource` decouples both from Embassy so they can run on the host.

#[cfg(test)]
use core::cell::Cell;

/// Platform-agnostic monotonic time source.
///
/// - `EmbassyTime` on the embedded target (free-running hardware timer)
/// - `MockTime` for host tests with controllable time
pub trait TimeSource: Clone {
    /// Returns current time in microseconds since system start.
    fn now_us(&self) -> u64;

    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }

    /// Returns the hub-stack timestamp: microseconds truncated to 32 bits.
    ///
    /// Wraps after ~71 minutes; the hub stack only uses differences.
    fn now_us32(&self) -> u32 {
        self.now_us() as u32
    }

    /// Returns elapsed time in microseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle a reference in the future.
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

// ============================================================================
// Embassy Implementation
// ============================================================================

/// Time source backed by the Embassy time driver.
#[cfg(feature = "embassy")]
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyTime;

#[cfg(feature = "embassy")]
impl TimeSource for EmbassyTime {
    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}

// ============================================================================
// Mock Implementation
// ============================================================================

/// Mock time source with manual advancement.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

#[cfg(test)]
impl MockTime {
    /// Creates a new `MockTime` starting at time 0.
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified time.
    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }
}

#[cfg(test)]
impl TimeSource for MockTime {
    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}
