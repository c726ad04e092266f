//! Mock delay for testing
//!
//! Completes after a single yield and accumulates the requested time so
//! tests can assert on pulse widths and poll budgets.

use core::cell::Cell;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;

/// Immediate delay that records total requested nanoseconds
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    total_ns: Rc<Cell<u64>>,
    calls: Rc<Cell<usize>>,
}

impl MockDelay {
    /// Create a new mock delay
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in microseconds
    pub fn total_us(&self) -> u64 {
        self.total_ns.get() / 1_000
    }

    /// Number of delay calls
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ns));
        self.calls.set(self.calls.get() + 1);
        tokio::task::yield_now().await;
    }

    async fn delay_us(&mut self, us: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(us) * 1_000);
        self.calls.set(self.calls.get() + 1);
        tokio::task::yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ns.set(self.total_ns.get() + u64::from(ms) * 1_000_000);
        self.calls.set(self.calls.get() + 1);
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_delay_accumulates() {
        let delay = MockDelay::new();
        let mut d = delay.clone();
        d.delay_ms(3).await;
        d.delay_us(50).await;
        assert_eq!(delay.total_us(), 3_050);
        assert_eq!(delay.calls(), 2);
    }
}
