//! Capture and transmit pipeline
//!
//! ```text
//! IMU task ──MotionRecord──> motion channel (2) ──┐
//!                                                  v
//! audio task ─ pool slot ─> frame FIFO ──> transmit task ──> link (MTU chunks)
//!                                                  ^
//!                          battery monitor (SoC) ──┘
//! ```
//!
//! Frame slots come from a fixed [`BufferPool`]; the audio task fills the
//! audio region and queues the slot, the transmit task completes the
//! motion and SoC fields, sends, and drops the slot back into the pool.

pub mod capture;
pub mod frame;
pub mod pool;
pub mod record;
pub mod transmit;

pub use capture::{
    capture_audio_once, capture_motion_once, run_audio_capture, run_imu_capture, start_audio,
    FrameBuffer, FrameFifo, FramePool, MotionChannel, MOTION_CHANNEL_DEPTH,
};
pub use frame::{FrameView, FrameWriter, FRAME_SIZE};
pub use pool::{BufferPool, PoolBuffer};
pub use record::{MotionRecord, MOTION_RECORD_SIZE};
pub use transmit::{FrameOutcome, TransmitStats, Transmitter};
