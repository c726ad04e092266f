//! SHTP (Sensor Hub Transport Protocol)
//!
//! Packet framing shared by the HAL adapter and the hub stack for
//! Hillcrest/CEVA BNO08x parts.
//!
//! # Protocol Overview
//!
//! - 4-byte header: length (2 bytes, LE, includes header), channel, sequence
//! - Bit 15 of the length marks a continuation packet and is not part of the
//!   length
//! - Each channel carries its own sequence number
//!
//! # Channels
//!
//! - Channel 0: Command (advertisement)
//! - Channel 1: Executable (reset complete)
//! - Channel 2: Control (Set Feature, Product ID)
//! - Channel 3: Input Report (sensor data)
//! - Channel 4: Wake Input Report
//! - Channel 5: Gyro-integrated rotation vector

mod hal;

pub use hal::{HalStats, HubHal, ShtpHal};

use core::fmt;

/// SHTP header size in bytes
pub const HEADER_SIZE: usize = 4;

/// Largest packet the host accepts (advertisement is ~284 bytes)
pub const MAX_PACKET_SIZE: usize = 384;

/// Number of SHTP channels
pub const NUM_CHANNELS: usize = 6;

/// Continuation flag in the raw length field
const CONTINUATION_BIT: u16 = 0x8000;

/// SHTP channel definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
#[repr(u8)]
pub enum ShtpChannel {
    /// Command channel (advertisement, error list)
    Command = 0,
    /// Executable channel (reset, on/sleep)
    Executable = 1,
    /// Control channel (sensor hub configuration)
    Control = 2,
    /// Input Report channel (sensor data to host)
    InputReport = 3,
    /// Wake Input Report channel
    WakeInputReport = 4,
    /// Gyro-integrated rotation vector channel
    Gyro = 5,
}

impl ShtpChannel {
    /// Convert from raw channel number
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Command),
            1 => Some(Self::Executable),
            2 => Some(Self::Control),
            3 => Some(Self::InputReport),
            4 => Some(Self::WakeInputReport),
            5 => Some(Self::Gyro),
            _ => None,
        }
    }
}

/// SHTP error types
///
/// Kept distinct internally even though the HAL boundary reports every
/// failure as "0 bytes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum ShtpError {
    /// Bus transfer failed
    TransportError,
    /// Header length shorter than the header itself
    InvalidHeader,
    /// Packet larger than the destination buffer
    PayloadTooLarge,
    /// Ready line not asserted within the poll budget
    Timeout,
    /// Hub reported an empty packet
    NoData,
}

impl fmt::Display for ShtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShtpError::TransportError => write!(f, "SHTP bus transfer failed"),
            ShtpError::InvalidHeader => write!(f, "Invalid SHTP header"),
            ShtpError::PayloadTooLarge => write!(f, "SHTP packet exceeds buffer"),
            ShtpError::Timeout => write!(f, "Timeout waiting for hub ready"),
            ShtpError::NoData => write!(f, "No SHTP data available"),
        }
    }
}

/// Parsed SHTP header
///
/// ```text
/// Byte 0-1: Length (little-endian, includes header)
///           Bit 15 (continuation): 0 = first/only packet, 1 = continuation
/// Byte 2:   Channel number (0-5)
/// Byte 3:   Sequence number (per-channel)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct ShtpHeader {
    /// Total packet length including header, continuation bit removed
    pub length: u16,
    /// Continuation flag
    pub continuation: bool,
    /// Channel number
    pub channel: u8,
    /// Sequence number for this channel
    pub sequence: u8,
}

impl ShtpHeader {
    /// Header for an outgoing packet carrying `payload_len` bytes
    pub fn for_payload(channel: ShtpChannel, sequence: u8, payload_len: usize) -> Self {
        Self {
            length: (HEADER_SIZE + payload_len) as u16,
            continuation: false,
            channel: channel as u8,
            sequence,
        }
    }

    /// Parse the first four bytes of `bytes`
    pub fn parse(bytes: &[u8]) -> Result<Self, ShtpError> {
        if bytes.len() < HEADER_SIZE {
            return Err(ShtpError::InvalidHeader);
        }
        let raw = u16::from_le_bytes([bytes[0], bytes[1]]);
        Ok(Self {
            length: raw & !CONTINUATION_BIT,
            continuation: raw & CONTINUATION_BIT != 0,
            channel: bytes[2],
            sequence: bytes[3],
        })
    }

    /// Get the channel as enum
    pub fn channel_type(&self) -> Option<ShtpChannel> {
        ShtpChannel::from_u8(self.channel)
    }

    /// Payload length (total length minus header)
    pub fn payload_len(&self) -> Result<usize, ShtpError> {
        usize::from(self.length)
            .checked_sub(HEADER_SIZE)
            .ok_or(ShtpError::InvalidHeader)
    }

    /// Build header into 4-byte buffer
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut raw = self.length & !CONTINUATION_BIT;
        if self.continuation {
            raw |= CONTINUATION_BIT;
        }
        let len_bytes = raw.to_le_bytes();
        [len_bytes[0], len_bytes[1], self.channel, self.sequence]
    }
}

/// Total packet length announced by a raw header, continuation bit masked
pub fn packet_length(header: &[u8; HEADER_SIZE]) -> usize {
    usize::from(u16::from_le_bytes([header[0], header[1]]) & !CONTINUATION_BIT)
}

/// Per-channel sequence counters for outgoing packets
#[derive(Debug, Clone, Default)]
pub struct SequenceCounters {
    next: [u8; NUM_CHANNELS],
}

impl SequenceCounters {
    /// All channels start at 0
    pub const fn new() -> Self {
        Self {
            next: [0u8; NUM_CHANNELS],
        }
    }

    /// Take the sequence number for the next packet on `channel`
    pub fn next(&mut self, channel: ShtpChannel) -> u8 {
        let slot = &mut self.next[channel as usize];
        let seq = *slot;
        *slot = slot.wrapping_add(1);
        seq
    }

    /// Restart every channel at 0 (after a hub reset)
    pub fn reset(&mut self) {
        self.next = [0u8; NUM_CHANNELS];
    }
}
