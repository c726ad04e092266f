//! Mock battery ADC for testing

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::devices::battery::BatteryAdc;
use crate::platform::{PlatformError, Result};

#[derive(Debug, Default)]
struct AdcState {
    codes: VecDeque<i16>,
    last: i16,
    reads: usize,
    setups: usize,
    fail_setup: bool,
    fail_reads: usize,
}

/// Mock ADC channel returning scripted codes
///
/// After the script is exhausted the last code repeats.
#[derive(Debug, Clone, Default)]
pub struct MockAdc {
    state: Rc<RefCell<AdcState>>,
}

impl MockAdc {
    /// Create a mock with the given code sequence
    pub fn new(codes: &[i16]) -> Self {
        let adc = Self::default();
        adc.state.borrow_mut().codes.extend(codes.iter().copied());
        adc
    }

    /// Queue more codes
    pub fn push_codes(&self, codes: &[i16]) {
        self.state.borrow_mut().codes.extend(codes.iter().copied());
    }

    /// Make `setup` fail
    pub fn fail_setup(&self) {
        self.state.borrow_mut().fail_setup = true;
    }

    /// Make the next read fail
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_reads += 1;
    }

    /// Successful reads so far
    pub fn reads(&self) -> usize {
        self.state.borrow().reads
    }

    /// Setup calls so far
    pub fn setups(&self) -> usize {
        self.state.borrow().setups
    }
}

impl BatteryAdc for MockAdc {
    async fn setup(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.setups += 1;
        if state.fail_setup {
            return Err(PlatformError::NotReady);
        }
        Ok(())
    }

    async fn read_raw(&mut self) -> Result<i16> {
        let mut state = self.state.borrow_mut();
        if state.fail_reads > 0 {
            state.fail_reads -= 1;
            return Err(PlatformError::NotReady);
        }
        if let Some(code) = state.codes.pop_front() {
            state.last = code;
        }
        state.reads += 1;
        Ok(state.last)
    }
}
