//! Sensor hub stack
//!
//! [`SensorHub`] is the contract the driver needs from an SH-2 stack: open,
//! product IDs, per-sensor configuration and a service call that decodes
//! whatever the hub sent and hands it to an event sink.
//!
//! [`Sh2Hub`] is a minimal native implementation over any [`HubHal`],
//! covering the reports this firmware enables.

use crate::communication::shtp::{
    HubHal, SequenceCounters, ShtpChannel, ShtpHeader, HEADER_SIZE, MAX_PACKET_SIZE,
};
use crate::devices::traits::SensorError;

use super::reports::{
    build_product_id_request, build_set_feature_command, walk_input_reports, ProductIdResponse,
    ReportId, SensorConfig, SensorEvent,
};

/// Packets drained after open (advertisement, reset complete, ...)
const MAX_STARTUP_PACKETS: usize = 8;

/// Packets examined while waiting for a command response
const MAX_RESPONSE_PACKETS: usize = 8;

/// Largest control payload sent by this stack (Set Feature)
const MAX_COMMAND_SIZE: usize = 17;

/// Executable channel: reset complete
const EXECUTABLE_RESET_COMPLETE: u8 = 0x01;

/// Non-sensor events from the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum AsyncEvent {
    /// Hub reset; enabled reports are lost
    Reset,
}

/// Receiver of decoded hub events
pub trait HubEventSink {
    /// One decoded sensor report
    fn on_sensor_event(&mut self, event: &SensorEvent);

    /// Non-sensor event
    fn on_async_event(&mut self, event: AsyncEvent);
}

/// SH-2 sensor hub stack contract
#[allow(async_fn_in_trait)]
pub trait SensorHub {
    /// Reset and open the hub
    async fn open(&mut self) -> Result<(), SensorError>;

    /// Request and wait for the product IDs
    async fn product_ids(&mut self) -> Result<ProductIdResponse, SensorError>;

    /// Configure one sensor report
    async fn set_sensor_config(
        &mut self,
        sensor: ReportId,
        config: &SensorConfig,
    ) -> Result<(), SensorError>;

    /// Process at most one incoming packet
    ///
    /// Returns the number of sensor events delivered to `sink`; 0 when the
    /// hub had nothing to say.
    async fn service<S: HubEventSink>(&mut self, sink: &mut S) -> Result<usize, SensorError>;
}

/// Native SH-2 stack over a [`HubHal`]
pub struct Sh2Hub<H: HubHal> {
    hal: H,
    sequence: SequenceCounters,
    buf: [u8; MAX_PACKET_SIZE],
}

impl<H: HubHal> Sh2Hub<H> {
    /// Create a stack over `hal`
    pub fn new(hal: H) -> Self {
        Self {
            hal,
            sequence: SequenceCounters::new(),
            buf: [0u8; MAX_PACKET_SIZE],
        }
    }

    /// Access the HAL
    pub fn hal(&self) -> &H {
        &self.hal
    }

    /// Release the HAL
    pub fn release(mut self) -> H {
        self.hal.close();
        self.hal
    }

    /// Hub clock in microseconds
    pub fn now_us(&self) -> u32 {
        self.hal.now_us()
    }

    async fn send(&mut self, channel: ShtpChannel, payload: &[u8]) -> Result<(), SensorError> {
        if payload.len() > MAX_COMMAND_SIZE {
            return Err(SensorError::Hub);
        }

        let header = ShtpHeader::for_payload(channel, self.sequence.next(channel), payload.len());
        let mut packet = [0u8; HEADER_SIZE + MAX_COMMAND_SIZE];
        let len = HEADER_SIZE + payload.len();
        packet[..HEADER_SIZE].copy_from_slice(&header.to_bytes());
        packet[HEADER_SIZE..len].copy_from_slice(payload);

        if self.hal.write(&packet[..len]).await == 0 {
            return Err(SensorError::Hub);
        }
        Ok(())
    }

    /// Read one packet into the internal buffer
    async fn receive(&mut self) -> Option<(ShtpHeader, usize)> {
        let n = self.hal.read(&mut self.buf).await;
        if n < HEADER_SIZE {
            return None;
        }
        let header = ShtpHeader::parse(&self.buf[..n]).ok()?;
        Some((header, n))
    }

    fn handle_executable(payload: &[u8]) -> Option<AsyncEvent> {
        if payload.first() == Some(&EXECUTABLE_RESET_COMPLETE) {
            crate::log_error!("SH2: hub reset");
            Some(AsyncEvent::Reset)
        } else {
            None
        }
    }
}

impl<H: HubHal> SensorHub for Sh2Hub<H> {
    async fn open(&mut self) -> Result<(), SensorError> {
        if let Err(e) = self.hal.open().await {
            crate::log_warn!("SH2: open: {:?}, continuing", e);
        }
        self.sequence.reset();

        for _ in 0..MAX_STARTUP_PACKETS {
            let Some((header, n)) = self.receive().await else {
                break;
            };
            if header.channel_type() == Some(ShtpChannel::Executable) {
                Self::handle_executable(&self.buf[HEADER_SIZE..n]);
            } else {
                crate::log_trace!("SH2: startup packet on channel {}", header.channel);
            }
        }

        Ok(())
    }

    async fn product_ids(&mut self) -> Result<ProductIdResponse, SensorError> {
        self.send(ShtpChannel::Control, &build_product_id_request())
            .await?;

        for _ in 0..MAX_RESPONSE_PACKETS {
            let Some((header, n)) = self.receive().await else {
                continue;
            };
            if header.channel_type() != Some(ShtpChannel::Control) {
                continue;
            }
            if let Some(ids) = ProductIdResponse::parse(&self.buf[HEADER_SIZE..n]) {
                crate::log_info!(
                    "SH2: product {} v{}.{}.{} build {}",
                    ids.sw_part_number,
                    ids.sw_version_major,
                    ids.sw_version_minor,
                    ids.sw_version_patch,
                    ids.sw_build_number
                );
                return Ok(ids);
            }
        }

        crate::log_error!("SH2: no product ID response");
        Err(SensorError::Hub)
    }

    async fn set_sensor_config(
        &mut self,
        sensor: ReportId,
        config: &SensorConfig,
    ) -> Result<(), SensorError> {
        let cmd = build_set_feature_command(sensor, config);
        self.send(ShtpChannel::Control, &cmd).await.inspect_err(|_| {
            crate::log_error!("SH2: set feature 0x{:02X} failed", sensor as u8);
        })
    }

    async fn service<S: HubEventSink>(&mut self, sink: &mut S) -> Result<usize, SensorError> {
        let Some((header, n)) = self.receive().await else {
            return Ok(0);
        };
        let payload = &self.buf[HEADER_SIZE..n];

        match header.channel_type() {
            Some(ShtpChannel::InputReport) | Some(ShtpChannel::WakeInputReport) => {
                Ok(walk_input_reports(payload, |event| sink.on_sensor_event(&event)))
            }
            Some(ShtpChannel::Executable) => {
                if let Some(event) = Self::handle_executable(payload) {
                    sink.on_async_event(event);
                }
                Ok(0)
            }
            _ => {
                crate::log_trace!("SH2: ignored packet on channel {}", header.channel);
                Ok(0)
            }
        }
    }
}
