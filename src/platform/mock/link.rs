//! Mock wireless link for testing

use core::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::communication::link::{BatteryService, ConnHandle, LinkError, WirelessLink};

#[derive(Debug, Default)]
struct LinkState {
    connection: Option<ConnHandle>,
    mtu: usize,
    sent: Vec<Vec<u8>>,
    send_failures: usize,
    levels: Vec<u8>,
    level_failures: usize,
}

/// Mock link recording sent chunks and battery level updates
#[derive(Debug, Clone, Default)]
pub struct MockLink {
    state: Rc<RefCell<LinkState>>,
}

impl MockLink {
    /// Disconnected link
    pub fn new() -> Self {
        Self::default()
    }

    /// Link connected with the given MTU
    pub fn connected(mtu: usize) -> Self {
        let link = Self::default();
        link.connect(ConnHandle(1), mtu);
        link
    }

    /// Simulate a connection
    pub fn connect(&self, conn: ConnHandle, mtu: usize) {
        let mut state = self.state.borrow_mut();
        state.connection = Some(conn);
        state.mtu = mtu;
    }

    /// Simulate a disconnection
    pub fn disconnect(&self) {
        self.state.borrow_mut().connection = None;
    }

    /// Make the next `count` sends fail
    pub fn fail_sends(&self, count: usize) {
        self.state.borrow_mut().send_failures = count;
    }

    /// Make the next battery level update fail
    pub fn fail_next_level(&self) {
        self.state.borrow_mut().level_failures += 1;
    }

    /// Chunks accepted by `send`, in order
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.borrow().sent.clone()
    }

    /// Battery levels accepted, in order
    pub fn levels(&self) -> Vec<u8> {
        self.state.borrow().levels.clone()
    }
}

impl WirelessLink for MockLink {
    fn active_connection(&self) -> Option<ConnHandle> {
        self.state.borrow().connection
    }

    fn current_mtu(&self, _conn: ConnHandle) -> usize {
        self.state.borrow().mtu
    }

    async fn send(&mut self, conn: ConnHandle, data: &[u8]) -> Result<(), LinkError> {
        let mut state = self.state.borrow_mut();
        if state.connection != Some(conn) {
            return Err(LinkError::NotConnected);
        }
        if data.len() > state.mtu {
            return Err(LinkError::TooLarge);
        }
        if state.send_failures > 0 {
            state.send_failures -= 1;
            return Err(LinkError::Busy);
        }
        state.sent.push(data.to_vec());
        Ok(())
    }
}

impl BatteryService for MockLink {
    async fn set_battery_level(&mut self, level: u8) -> Result<(), LinkError> {
        let mut state = self.state.borrow_mut();
        if state.level_failures > 0 {
            state.level_failures -= 1;
            return Err(LinkError::Stack);
        }
        state.levels.push(level);
        Ok(())
    }
}
