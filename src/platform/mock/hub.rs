//! Mock hub HAL for testing the SH-2 layer without a bus

use core::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use crate::communication::shtp::{HubHal, ShtpChannel, ShtpError, ShtpHeader};

#[derive(Debug, Default)]
struct HubHalState {
    packets: VecDeque<Vec<u8>>,
    replies: VecDeque<Vec<u8>>,
    writes: Vec<Vec<u8>>,
    opens: usize,
    open_timeout: bool,
    write_failures: usize,
    now_us: u32,
}

/// Scripted [`HubHal`]
///
/// `read` pops whole packets (header included); an empty script reads as 0
/// bytes, like a ready-line timeout. Replies queued with
/// [`MockHubHal::reply_on_write`] become readable one per successful write.
#[derive(Debug, Clone, Default)]
pub struct MockHubHal {
    state: Rc<RefCell<HubHalState>>,
}

impl MockHubHal {
    /// Create a HAL with no scripted packets
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a packet on `channel` carrying `payload`
    pub fn push_packet(&self, channel: ShtpChannel, payload: &[u8]) {
        let header = ShtpHeader::for_payload(channel, 0, payload.len());
        let mut packet = header.to_bytes().to_vec();
        packet.extend_from_slice(payload);
        self.push_raw(&packet);
    }

    /// Queue a packet that becomes readable after the next successful write
    pub fn reply_on_write(&self, channel: ShtpChannel, payload: &[u8]) {
        let header = ShtpHeader::for_payload(channel, 0, payload.len());
        let mut packet = header.to_bytes().to_vec();
        packet.extend_from_slice(payload);
        self.state.borrow_mut().replies.push_back(packet);
    }

    /// Queue raw bytes returned by one `read`
    pub fn push_raw(&self, bytes: &[u8]) {
        self.state.borrow_mut().packets.push_back(bytes.to_vec());
    }

    /// Make `open` report a ready-line timeout
    pub fn set_open_timeout(&self, timeout: bool) {
        self.state.borrow_mut().open_timeout = timeout;
    }

    /// Make the next `count` writes fail
    pub fn fail_writes(&self, count: usize) {
        self.state.borrow_mut().write_failures = count;
    }

    /// Set the clock value returned by `now_us`
    pub fn set_now_us(&self, us: u32) {
        self.state.borrow_mut().now_us = us;
    }

    /// Packets written so far
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state.borrow().writes.clone()
    }

    /// Payloads (header stripped) written so far
    pub fn written_payloads(&self) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .writes
            .iter()
            .map(|w| w.get(4..).unwrap_or_default().to_vec())
            .collect()
    }

    /// Number of `open` calls
    pub fn opens(&self) -> usize {
        self.state.borrow().opens
    }

    /// Scripted packets not yet read
    pub fn pending_packets(&self) -> usize {
        self.state.borrow().packets.len()
    }
}

impl HubHal for MockHubHal {
    async fn open(&mut self) -> Result<(), ShtpError> {
        let mut state = self.state.borrow_mut();
        state.opens += 1;
        if state.open_timeout {
            return Err(ShtpError::Timeout);
        }
        Ok(())
    }

    fn close(&mut self) {}

    async fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut state = self.state.borrow_mut();
        match state.packets.pop_front() {
            Some(packet) if packet.len() <= buf.len() => {
                buf[..packet.len()].copy_from_slice(&packet);
                packet.len()
            }
            _ => 0,
        }
    }

    async fn write(&mut self, buf: &[u8]) -> usize {
        let mut state = self.state.borrow_mut();
        if state.write_failures > 0 {
            state.write_failures -= 1;
            return 0;
        }
        state.writes.push(buf.to_vec());
        if let Some(reply) = state.replies.pop_front() {
            state.packets.push_back(reply);
        }
        buf.len()
    }

    fn now_us(&self) -> u32 {
        self.state.borrow().now_us
    }
}
