//! Mock GPIO pins for testing

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::devices::imu::bno08x::{CtrlPin, IntPin};

#[derive(Debug, Default)]
struct IntPinState {
    level_script: VecDeque<bool>,
    default_low: bool,
    polls: usize,
    edges: usize,
}

/// Mock interrupt/ready input
///
/// `is_low` pops scripted levels first, then returns the default level.
/// `wait_for_falling_edge` completes once per injected edge, yielding to the
/// runtime while none is queued.
#[derive(Debug, Clone, Default)]
pub struct MockIntPin {
    state: Rc<RefCell<IntPinState>>,
}

impl MockIntPin {
    /// Line that is permanently asserted (always ready)
    pub fn asserted() -> Self {
        let pin = Self::default();
        pin.state.borrow_mut().default_low = true;
        pin
    }

    /// Line that is never asserted
    pub fn idle() -> Self {
        Self::default()
    }

    /// Queue levels returned by the next `is_low` calls
    pub fn script_levels(&self, levels: &[bool]) {
        self.state.borrow_mut().level_script.extend(levels.iter().copied());
    }

    /// Change the level returned once the script is exhausted
    pub fn set_default_low(&self, low: bool) {
        self.state.borrow_mut().default_low = low;
    }

    /// Inject a falling edge
    pub fn trigger_edge(&self) {
        self.state.borrow_mut().edges += 1;
    }

    /// Number of `is_low` polls so far
    pub fn polls(&self) -> usize {
        self.state.borrow().polls
    }
}

impl IntPin for MockIntPin {
    async fn wait_for_falling_edge(&mut self) {
        loop {
            {
                let mut state = self.state.borrow_mut();
                if state.edges > 0 {
                    state.edges -= 1;
                    return;
                }
            }
            tokio::task::yield_now().await;
        }
    }

    fn is_low(&self) -> bool {
        let mut state = self.state.borrow_mut();
        state.polls += 1;
        match state.level_script.pop_front() {
            Some(level) => level,
            None => state.default_low,
        }
    }
}

/// Mock control output recording every level change
#[derive(Debug, Clone, Default)]
pub struct MockCtrlPin {
    history: Rc<RefCell<Vec<bool>>>,
}

impl MockCtrlPin {
    /// Create a new pin with empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels driven so far (`true` = high)
    pub fn history(&self) -> Vec<bool> {
        self.history.borrow().clone()
    }

    /// Last driven level, if any
    pub fn is_high(&self) -> Option<bool> {
        self.history.borrow().last().copied()
    }
}

impl CtrlPin for MockCtrlPin {
    fn set_low(&mut self) {
        self.history.borrow_mut().push(false);
    }

    fn set_high(&mut self) {
        self.history.borrow_mut().push(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_pin_script_then_default() {
        let pin = MockIntPin::asserted();
        pin.script_levels(&[false, false]);
        assert!(!pin.is_low());
        assert!(!pin.is_low());
        assert!(pin.is_low());
        assert_eq!(pin.polls(), 3);
    }

    #[tokio::test]
    async fn test_int_pin_edge() {
        let pin = MockIntPin::idle();
        pin.trigger_edge();
        let mut line = pin.clone();
        line.wait_for_falling_edge().await;
    }

    #[test]
    fn test_ctrl_pin_history() {
        let pin = MockCtrlPin::new();
        let mut out = pin.clone();
        out.set_low();
        out.set_high();
        assert_eq!(pin.history(), vec![false, true]);
        assert_eq!(pin.is_high(), Some(true));
    }
}
