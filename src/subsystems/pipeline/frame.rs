//! Link frame layout
//!
//! ```text
//! 0        180                    232    233        237
//! | audio  | motion record (52 B) | flag | SoC (f32) |
//! ```
//!
//! The motion bytes are only meaningful when the flag is 1; otherwise they
//! hold whatever the slot carried before and receivers ignore them. All
//! multi-byte fields are little-endian.

use super::record::{MotionRecord, MOTION_RECORD_SIZE};
use crate::parameters::audio::AUDIO_BLOCK_SIZE;

/// Offset of the audio block
pub const AUDIO_OFFSET: usize = 0;

/// Offset of the motion record
pub const MOTION_OFFSET: usize = AUDIO_OFFSET + AUDIO_BLOCK_SIZE;

/// Offset of the motion-valid flag
pub const MOTION_FLAG_OFFSET: usize = MOTION_OFFSET + MOTION_RECORD_SIZE;

/// Offset of the battery state of charge
pub const SOC_OFFSET: usize = MOTION_FLAG_OFFSET + 1;

/// Total frame size
pub const FRAME_SIZE: usize = SOC_OFFSET + core::mem::size_of::<f32>();

/// Writer over a frame-sized buffer
pub struct FrameWriter<'a> {
    buf: &'a mut [u8; FRAME_SIZE],
}

impl<'a> FrameWriter<'a> {
    /// Wrap a frame buffer
    pub fn new(buf: &'a mut [u8; FRAME_SIZE]) -> Self {
        Self { buf }
    }

    /// Audio block region
    pub fn audio_mut(&mut self) -> &mut [u8] {
        &mut self.buf[AUDIO_OFFSET..MOTION_OFFSET]
    }

    /// Attach a motion record, or mark the motion field invalid
    ///
    /// With `None` only the flag is written.
    pub fn write_motion(&mut self, record: Option<&MotionRecord>) {
        match record {
            Some(record) => {
                let mut bytes = [0u8; MOTION_RECORD_SIZE];
                record.write_to(&mut bytes);
                self.buf[MOTION_OFFSET..MOTION_FLAG_OFFSET].copy_from_slice(&bytes);
                self.buf[MOTION_FLAG_OFFSET] = 1;
            }
            None => self.buf[MOTION_FLAG_OFFSET] = 0,
        }
    }

    /// Store the battery state of charge (percent)
    pub fn write_soc(&mut self, soc: f32) {
        self.buf[SOC_OFFSET..FRAME_SIZE].copy_from_slice(&soc.to_le_bytes());
    }

    /// Finished frame
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..]
    }
}

/// Read-only view of a received frame
pub struct FrameView<'a> {
    buf: &'a [u8],
}

impl<'a> FrameView<'a> {
    /// View `buf` as a frame; `None` when it is not exactly one frame long
    pub fn parse(buf: &'a [u8]) -> Option<Self> {
        (buf.len() == FRAME_SIZE).then_some(Self { buf })
    }

    /// Audio block
    pub fn audio(&self) -> &[u8] {
        &self.buf[AUDIO_OFFSET..MOTION_OFFSET]
    }

    /// Motion-valid flag
    pub fn motion_valid(&self) -> bool {
        self.buf[MOTION_FLAG_OFFSET] == 1
    }

    /// Motion record, only when the flag is set
    pub fn motion(&self) -> Option<MotionRecord> {
        if !self.motion_valid() {
            return None;
        }
        let mut bytes = [0u8; MOTION_RECORD_SIZE];
        bytes.copy_from_slice(&self.buf[MOTION_OFFSET..MOTION_FLAG_OFFSET]);
        Some(MotionRecord::read_from(&bytes))
    }

    /// Battery state of charge (percent)
    pub fn soc(&self) -> f32 {
        let b = &self.buf[SOC_OFFSET..FRAME_SIZE];
        f32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }
}
