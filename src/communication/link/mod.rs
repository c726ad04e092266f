//! Wireless link contract
//!
//! The connection, bonding and security stack lives outside this crate.
//! The pipeline only needs the active connection, its negotiated maximum
//! payload (MTU), a best-effort `send`, connect/disconnect notifications
//! and the standard Battery Service level characteristic.

use core::fmt;

/// Opaque handle of an established connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct ConnHandle(pub u16);

/// Connection lifecycle notifications from the link stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum LinkEvent {
    /// A central connected
    Connected(ConnHandle),
    /// The connection was lost or closed
    Disconnected(ConnHandle),
}

/// Link-layer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum LinkError {
    /// No connection is active
    NotConnected,
    /// Transmit queue of the link stack is full
    Busy,
    /// Payload larger than the negotiated MTU
    TooLarge,
    /// Stack reported another failure
    Stack,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::NotConnected => write!(f, "No active connection"),
            LinkError::Busy => write!(f, "Link busy"),
            LinkError::TooLarge => write!(f, "Payload exceeds MTU"),
            LinkError::Stack => write!(f, "Link stack error"),
        }
    }
}

/// Data path of the wireless transport
#[allow(async_fn_in_trait)]
pub trait WirelessLink {
    /// Currently active connection, if any
    fn active_connection(&self) -> Option<ConnHandle>;

    /// Negotiated maximum single-send payload for `conn`, in bytes
    fn current_mtu(&self, conn: ConnHandle) -> usize;

    /// Queue `data` for transmission. Best-effort; callers do not retry.
    async fn send(&mut self, conn: ConnHandle, data: &[u8]) -> Result<(), LinkError>;
}

/// Battery Service (level characteristic) of the link stack
#[allow(async_fn_in_trait)]
pub trait BatteryService {
    /// Publish a new battery level, 0..=100
    async fn set_battery_level(&mut self, level: u8) -> Result<(), LinkError>;
}

/// Split `frame` into sequential chunks of at most `mtu` bytes
///
/// The last chunk may be shorter. An `mtu` of 0 yields no chunks.
pub fn fragment(frame: &[u8], mtu: usize) -> impl Iterator<Item = &[u8]> {
    let size = if mtu == 0 { frame.len().max(1) } else { mtu };
    frame.chunks(size).take(if mtu == 0 { 0 } else { usize::MAX })
}
