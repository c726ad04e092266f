//! Mock PDM microphone for testing

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::devices::audio::{AudioError, AudioSource};
use crate::parameters::AudioParams;

#[derive(Debug, Default)]
struct MicState {
    blocks: VecDeque<Result<u8, AudioError>>,
    configured: Option<AudioParams>,
    running: bool,
    starts: usize,
    reads: usize,
}

/// Mock microphone
///
/// Each scripted block fills the destination with one fill byte, or fails
/// with the scripted error. An exhausted script never completes a read.
#[derive(Debug, Clone, Default)]
pub struct MockMic {
    state: Rc<RefCell<MicState>>,
}

impl MockMic {
    /// Create a mic with no scripted blocks
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a block filled with `fill`
    pub fn push_block(&self, fill: u8) {
        self.state.borrow_mut().blocks.push_back(Ok(fill));
    }

    /// Queue a failing read
    pub fn push_error(&self, err: AudioError) {
        self.state.borrow_mut().blocks.push_back(Err(err));
    }

    /// Configuration applied by `configure`
    pub fn configured(&self) -> Option<AudioParams> {
        self.state.borrow().configured
    }

    /// Whether the stream is running
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Number of `start` calls
    pub fn starts(&self) -> usize {
        self.state.borrow().starts
    }

    /// Number of completed reads (including failed ones)
    pub fn reads(&self) -> usize {
        self.state.borrow().reads
    }

    /// Scripted blocks not yet consumed
    pub fn pending_blocks(&self) -> usize {
        self.state.borrow().blocks.len()
    }
}

impl AudioSource for MockMic {
    async fn configure(&mut self, params: &AudioParams) -> Result<(), AudioError> {
        self.state.borrow_mut().configured = Some(*params);
        Ok(())
    }

    async fn start(&mut self) -> Result<(), AudioError> {
        let mut state = self.state.borrow_mut();
        if state.configured.is_none() {
            return Err(AudioError::InvalidConfig);
        }
        state.running = true;
        state.starts += 1;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), AudioError> {
        self.state.borrow_mut().running = false;
        Ok(())
    }

    async fn read_block(&mut self, dst: &mut [u8]) -> Result<usize, AudioError> {
        loop {
            {
                let mut state = self.state.borrow_mut();
                if !state.running {
                    return Err(AudioError::NotRunning);
                }
                if let Some(next) = state.blocks.pop_front() {
                    state.reads += 1;
                    return next.map(|fill| {
                        dst.fill(fill);
                        dst.len()
                    });
                }
            }
            tokio::task::yield_now().await;
        }
    }
}
