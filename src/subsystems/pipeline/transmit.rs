//! Transmit task
//!
//! Per frame: take the next filled slot from the FIFO, attach a motion
//! record if one arrives within the bounded wait, stamp the battery state
//! of charge, split the frame to the connection's MTU and send the chunks
//! in order. The slot goes back to the pool whatever happened to the send.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use super::capture::{FrameBuffer, FrameFifo, MotionChannel};
use super::frame::FrameWriter;
use crate::communication::link::{fragment, WirelessLink};
use crate::devices::battery::{BatteryAdc, BatteryMonitor};
use crate::parameters::LinkParams;

/// Transmit counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct TransmitStats {
    /// Frames handed to the link (some chunks may have failed)
    pub frames_sent: u32,
    /// Frames dropped without a connection
    pub frames_dropped: u32,
    /// Chunks the link refused
    pub chunks_failed: u32,
    /// Frames carrying a valid motion record
    pub motion_attached: u32,
}

/// What happened to one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum FrameOutcome {
    /// Chunks were offered to the link
    Sent {
        /// Chunks offered
        chunks: usize,
        /// Chunks refused
        failed: usize,
    },
    /// No connection (or no usable MTU); the frame was discarded
    Dropped,
}

/// Transmit task state
pub struct Transmitter<'a, M: RawMutex, L: WirelessLink, A: BatteryAdc, D: DelayNs> {
    link: L,
    motion: &'a MotionChannel<M>,
    battery: &'a BatteryMonitor<M, A>,
    delay: D,
    params: LinkParams,
    stats: TransmitStats,
}

impl<'a, M: RawMutex, L: WirelessLink, A: BatteryAdc, D: DelayNs> Transmitter<'a, M, L, A, D> {
    /// Create a transmitter
    pub fn new(
        link: L,
        motion: &'a MotionChannel<M>,
        battery: &'a BatteryMonitor<M, A>,
        delay: D,
        params: LinkParams,
    ) -> Self {
        Self {
            link,
            motion,
            battery,
            delay,
            params,
            stats: TransmitStats::default(),
        }
    }

    /// Counters since creation
    pub fn stats(&self) -> TransmitStats {
        self.stats
    }

    /// Access the link
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Complete and send one frame, then release its slot
    pub async fn transmit_frame<const N: usize>(
        &mut self,
        mut buf: FrameBuffer<'_, M, N>,
    ) -> FrameOutcome {
        let record = match select(
            self.motion.receive(),
            self.delay.delay_us(self.params.motion_wait_us),
        )
        .await
        {
            Either::First(record) => Some(record),
            Either::Second(()) => None,
        };

        let soc = self.battery.get_soc();
        let mut frame = FrameWriter::new(&mut buf);
        frame.write_motion(record.as_ref());
        frame.write_soc(f32::from(soc));
        if record.is_some() {
            self.stats.motion_attached = self.stats.motion_attached.wrapping_add(1);
        }

        let Some(conn) = self.link.active_connection() else {
            crate::log_debug!("No connection, frame dropped");
            self.stats.frames_dropped = self.stats.frames_dropped.wrapping_add(1);
            return FrameOutcome::Dropped;
        };

        let mtu = self.link.current_mtu(conn);
        if mtu == 0 {
            crate::log_warn!("Link reports zero MTU, frame dropped");
            self.stats.frames_dropped = self.stats.frames_dropped.wrapping_add(1);
            return FrameOutcome::Dropped;
        }

        let bytes = frame.as_bytes();
        crate::log_trace!("Frame {} bytes, MTU {}, SoC {}%", bytes.len(), mtu, soc);

        let mut chunks = 0;
        let mut failed = 0;
        for chunk in fragment(bytes, mtu) {
            chunks += 1;
            if let Err(e) = self.link.send(conn, chunk).await {
                crate::log_debug!("Chunk send failed: {:?}", e);
                failed += 1;
            }
        }

        self.stats.frames_sent = self.stats.frames_sent.wrapping_add(1);
        self.stats.chunks_failed = self.stats.chunks_failed.wrapping_add(failed as u32);
        FrameOutcome::Sent { chunks, failed }
    }

    /// Wait for the next frame and transmit it
    pub async fn run_once<const N: usize>(&mut self, fifo: &FrameFifo<'_, M, N>) -> FrameOutcome {
        let buf = fifo.receive().await;
        self.transmit_frame(buf).await
    }

    /// Transmit task body
    pub async fn run<const N: usize>(&mut self, fifo: &FrameFifo<'_, M, N>) -> ! {
        crate::log_info!("Transmit task started");
        loop {
            self.run_once(fifo).await;
        }
    }
}
