//! Hub stack HAL adapter
//!
//! Implements the open/close/read/write/now contract the sensor-hub stack
//! runs on, in terms of a [`BusTransport`] and the hub's GPIO lines:
//!
//! - H_INTN (ready): active low; every transfer waits for it with a bounded
//!   poll (default 5 µs granularity, 50 ms budget)
//! - RST: pulsed low on `open`
//! - WAKE (optional): low -> wait ready -> settle -> high before writes
//!
//! # Failure Policy
//!
//! `read`/`write` report every failure as "0 bytes" because the hub stack
//! polls and retries on its own schedule. The typed paths
//! ([`ShtpHal::read_packet`], [`ShtpHal::write_packet`]) keep the causes
//! apart and [`HalStats`] counts each one.
//!
//! The bus sits behind an async mutex shared with the trigger subsystem.
//! The lock is held for one bus transfer only, never across a ready wait.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal_async::delay::DelayNs;

use super::{packet_length, ShtpError, HEADER_SIZE};
use crate::core::traits::TimeSource;
use crate::devices::bus::BusTransport;
use crate::devices::imu::bno08x::{CtrlPin, IntPin};
use crate::parameters::ImuParams;

/// Register byte sent ahead of every hub read
const HUB_READ_REGISTER: u8 = 0x00;

/// Hub stack HAL contract
#[allow(async_fn_in_trait)]
pub trait HubHal {
    /// Reset the hub and wait for it to come up
    ///
    /// A ready-line timeout is returned as [`ShtpError::Timeout`]; callers
    /// treat it as non-fatal and retry at a higher level.
    async fn open(&mut self) -> Result<(), ShtpError>;

    /// Release the hub
    fn close(&mut self);

    /// Read one packet (header included) into `buf`
    ///
    /// Returns the packet length, or 0 when no packet could be read.
    async fn read(&mut self, buf: &mut [u8]) -> usize;

    /// Write one packet (header included)
    ///
    /// Returns `buf.len()`, or 0 when the write failed.
    async fn write(&mut self, buf: &[u8]) -> usize;

    /// Monotonic microsecond clock
    fn now_us(&self) -> u32;
}

/// Transfer counters kept by [`ShtpHal`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct HalStats {
    /// Packets read successfully
    pub packets_read: u32,
    /// Packets written successfully
    pub packets_written: u32,
    /// Ready-line timeouts
    pub timeouts: u32,
    /// Packets that did not fit the caller's buffer
    pub oversize: u32,
    /// Bus transfer failures
    pub bus_errors: u32,
    /// Empty packets (zero length header)
    pub empty: u32,
}

/// SHTP HAL over a shared register bus
pub struct ShtpHal<'a, M, B, R, S, W, D, T>
where
    M: RawMutex,
    B: BusTransport,
    R: IntPin,
    S: CtrlPin,
    W: CtrlPin,
    D: DelayNs,
    T: TimeSource,
{
    bus: &'a Mutex<M, B>,
    ready: R,
    reset: S,
    wake: Option<W>,
    delay: D,
    time: T,
    params: ImuParams,
    stats: HalStats,
}

impl<'a, M, B, R, S, W, D, T> ShtpHal<'a, M, B, R, S, W, D, T>
where
    M: RawMutex,
    B: BusTransport,
    R: IntPin,
    S: CtrlPin,
    W: CtrlPin,
    D: DelayNs,
    T: TimeSource,
{
    /// Create a HAL adapter
    ///
    /// Pass `None` for `wake` when the wake line is not wired (I2C boards).
    pub fn new(
        bus: &'a Mutex<M, B>,
        ready: R,
        reset: S,
        wake: Option<W>,
        delay: D,
        time: T,
        params: ImuParams,
    ) -> Self {
        Self {
            bus,
            ready,
            reset,
            wake,
            delay,
            time,
            params,
            stats: HalStats::default(),
        }
    }

    /// Transfer counters since construction
    pub fn stats(&self) -> HalStats {
        self.stats
    }

    /// Pulse RST low, then hold high before the hub boots
    pub async fn hardware_reset(&mut self) {
        crate::log_warn!("BNO08x: hardware reset");
        self.reset.set_low();
        self.delay.delay_ms(self.params.reset_pulse_ms).await;
        self.reset.set_high();
        self.delay.delay_ms(self.params.reset_pulse_ms).await;
    }

    /// Poll H_INTN until asserted or the poll budget runs out
    pub async fn wait_ready(&mut self) -> Result<(), ShtpError> {
        for _ in 0..self.params.ready_poll_budget() {
            if self.ready.is_low() {
                return Ok(());
            }
            self.delay.delay_us(self.params.ready_poll_us).await;
        }
        self.stats.timeouts += 1;
        Err(ShtpError::Timeout)
    }

    /// Wake handshake; no-op without a wake line
    async fn wake(&mut self) -> Result<(), ShtpError> {
        let Some(wake) = self.wake.as_mut() else {
            return Ok(());
        };
        wake.set_low();
        let result = self.wait_ready().await;
        self.delay.delay_us(self.params.wake_settle_us).await;
        if let Some(wake) = self.wake.as_mut() {
            wake.set_high();
        }
        result
    }

    async fn bus_read(&mut self, buf: &mut [u8]) -> Result<(), ShtpError> {
        let bus = self.bus;
        let result = bus.lock().await.read(HUB_READ_REGISTER, buf).await;
        result.map_err(|e| {
            crate::log_debug!("BNO08x: bus read failed: {:?}", e);
            self.stats.bus_errors += 1;
            ShtpError::TransportError
        })
    }

    /// Read one packet into `buf`, keeping the failure cause
    ///
    /// Reads the 4-byte header first, checks the announced length against
    /// `buf`, then reads the whole packet (header included) from the start.
    pub async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, ShtpError> {
        self.wait_ready().await?;

        let mut header = [0u8; HEADER_SIZE];
        self.bus_read(&mut header).await?;

        let len = packet_length(&header);
        if len == 0 {
            self.stats.empty += 1;
            return Err(ShtpError::NoData);
        }
        if len > buf.len() {
            crate::log_warn!(
                "BNO08x: packet of {} bytes exceeds buffer of {}",
                len,
                buf.len()
            );
            self.stats.oversize += 1;
            return Err(ShtpError::PayloadTooLarge);
        }

        self.wait_ready().await?;
        self.bus_read(&mut buf[..len]).await?;

        self.stats.packets_read += 1;
        Ok(len)
    }

    /// Write one packet, keeping the failure cause
    pub async fn write_packet(&mut self, buf: &[u8]) -> Result<usize, ShtpError> {
        self.wake().await?;
        self.wait_ready().await?;

        let bus = self.bus;
        let result = bus.lock().await.write(buf).await;
        result.map_err(|e| {
            crate::log_debug!("BNO08x: bus write failed: {:?}", e);
            self.stats.bus_errors += 1;
            ShtpError::TransportError
        })?;

        self.stats.packets_written += 1;
        Ok(buf.len())
    }
}

impl<M, B, R, S, W, D, T> HubHal for ShtpHal<'_, M, B, R, S, W, D, T>
where
    M: RawMutex,
    B: BusTransport,
    R: IntPin,
    S: CtrlPin,
    W: CtrlPin,
    D: DelayNs,
    T: TimeSource,
{
    async fn open(&mut self) -> Result<(), ShtpError> {
        self.hardware_reset().await;
        self.wait_ready().await.inspect_err(|_| {
            crate::log_warn!("BNO08x: no H_INTN after reset");
        })
    }

    fn close(&mut self) {}

    async fn read(&mut self, buf: &mut [u8]) -> usize {
        match self.read_packet(buf).await {
            Ok(len) => len,
            Err(ShtpError::NoData) => 0,
            Err(e) => {
                crate::log_debug!("BNO08x: read dropped: {:?}", e);
                0
            }
        }
    }

    async fn write(&mut self, buf: &[u8]) -> usize {
        match self.write_packet(buf).await {
            Ok(len) => len,
            Err(e) => {
                crate::log_error!("BNO08x: write dropped: {:?}", e);
                0
            }
        }
    }

    fn now_us(&self) -> u32 {
        self.time.now_us32()
    }
}
