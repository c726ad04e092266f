//! BNO08x device driver
//!
//! Owns the sensor-hub stack and the sample store. `init` brings the hub up
//! and enables the four report groups the capture pipeline reads;
//! `sample_fetch` services the hub once and `channel_get` serves the latest
//! value of each group.
//!
//! The bus handle is shared with the hub HAL and the trigger subsystem; the
//! driver only touches it for the one-time check and init.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;

use super::hub::SensorHub;
use super::reports::{ProductIdResponse, ReportId, SensorConfig};
use super::samples::SampleStore;
use crate::devices::bus::{BusStatus, BusTransport};
use crate::devices::traits::{
    ChannelReading, SensorAttribute, SensorChannel, SensorDevice, SensorError,
};
use crate::parameters::ImuParams;

/// Reports enabled at init, in enable order
const ENABLED_REPORTS: [ReportId; 4] = [
    ReportId::RotationVector,
    ReportId::Accelerometer,
    ReportId::GyroscopeCalibrated,
    ReportId::MagneticFieldCalibrated,
];

/// BNO08x driver
///
/// # Example
///
/// ```ignore
/// let hal = ShtpHal::new(&BUS, ready, reset, Some(wake), Delay, EmbassyTime, params);
/// let mut imu = Bno08x::new(&BUS, Sh2Hub::new(hal), params);
/// imu.init().await?;
///
/// imu.sample_fetch(SensorChannel::All).await?;
/// let q = imu.channel_get(SensorChannel::RotationVecIjkr)?;
/// ```
pub struct Bno08x<'a, M: RawMutex, B: BusTransport, H: SensorHub> {
    bus: &'a Mutex<M, B>,
    hub: H,
    params: ImuParams,
    samples: SampleStore,
    product_ids: Option<ProductIdResponse>,
    accel_interval_us: u32,
    gyro_interval_us: u32,
    handled_resets: u32,
    initialized: bool,
}

impl<'a, M: RawMutex, B: BusTransport, H: SensorHub> Bno08x<'a, M, B, H> {
    /// Create a driver; call [`Bno08x::init`] before fetching
    pub fn new(bus: &'a Mutex<M, B>, hub: H, params: ImuParams) -> Self {
        Self {
            bus,
            hub,
            params,
            samples: SampleStore::new(),
            product_ids: None,
            accel_interval_us: params.report_interval_us,
            gyro_interval_us: params.report_interval_us,
            handled_resets: 0,
            initialized: false,
        }
    }

    /// Bring the device up
    ///
    /// Bus check and init, then up to `init_attempts` rounds of hub open +
    /// product-ID query, then the report enables.
    pub async fn init(&mut self) -> Result<(), SensorError> {
        crate::log_info!("BNO08X init");
        self.initialized = false;

        {
            let mut bus = self.bus.lock().await;
            if bus.check() == BusStatus::NotReady {
                crate::log_error!("BNO08X init failed: bus not ready");
                return Err(SensorError::Bus);
            }
            bus.init().await.map_err(|e| {
                crate::log_error!("BNO08X init failed: bus init: {:?}", e);
                SensorError::Bus
            })?;
        }

        let ids = self.open_hub().await.inspect_err(|e| {
            crate::log_error!("BNO08X init failed: {:?}", e);
        })?;
        self.product_ids = Some(ids);
        self.samples.clear();
        self.handled_resets = self.samples.resets();

        self.enable_reports().await.inspect_err(|e| {
            crate::log_error!("BNO08X init failed: report enable: {:?}", e);
        })?;

        self.initialized = true;
        crate::log_info!("BNO08X init done");
        Ok(())
    }

    async fn open_hub(&mut self) -> Result<ProductIdResponse, SensorError> {
        let attempts = self.params.init_attempts.max(1);
        let mut last = SensorError::Hub;

        for attempt in 1..=attempts {
            let result = match self.hub.open().await {
                Ok(()) => self.hub.product_ids().await,
                Err(e) => Err(e),
            };
            match result {
                Ok(ids) => return Ok(ids),
                Err(e) => {
                    crate::log_warn!("BNO08X: hub open attempt {}/{}: {:?}", attempt, attempts, e);
                    last = e;
                }
            }
        }

        Err(last)
    }

    async fn enable_reports(&mut self) -> Result<(), SensorError> {
        for report in ENABLED_REPORTS {
            let interval = self.interval_for(report);
            self.hub
                .set_sensor_config(report, &SensorConfig::periodic(interval))
                .await?;
        }
        Ok(())
    }

    fn interval_for(&self, report: ReportId) -> u32 {
        match report {
            ReportId::Accelerometer => self.accel_interval_us,
            ReportId::GyroscopeCalibrated => self.gyro_interval_us,
            _ => self.params.report_interval_us,
        }
    }

    /// Whether `init` has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Product IDs read during init
    pub fn product_ids(&self) -> Option<ProductIdResponse> {
        self.product_ids
    }

    /// Latest samples
    pub fn samples(&self) -> &SampleStore {
        &self.samples
    }

    /// Access the hub stack
    pub fn hub(&self) -> &H {
        &self.hub
    }

    /// Set a channel attribute
    ///
    /// Only the accelerometer and gyroscope sampling frequency (Hz) are
    /// supported; the new rate is sent to the hub immediately.
    pub async fn attr_set(
        &mut self,
        channel: SensorChannel,
        attr: SensorAttribute,
        value: f32,
    ) -> Result<(), SensorError> {
        let report = match (attr, channel) {
            (SensorAttribute::SamplingFrequency, c) if c.is_accel() => ReportId::Accelerometer,
            (SensorAttribute::SamplingFrequency, c) if c.is_gyro() => {
                ReportId::GyroscopeCalibrated
            }
            _ => return Err(SensorError::NotSupported),
        };

        if value <= 0.0 || !value.is_finite() {
            return Err(SensorError::InvalidValue);
        }
        let interval = ((1_000_000.0 / value) as u32).max(1);

        if self.initialized {
            self.hub
                .set_sensor_config(report, &SensorConfig::periodic(interval))
                .await?;
        }
        match report {
            ReportId::Accelerometer => self.accel_interval_us = interval,
            _ => self.gyro_interval_us = interval,
        }

        crate::log_info!("BNO08X: report 0x{:02X} interval {} us", report as u8, interval);
        Ok(())
    }
}

impl<M: RawMutex, B: BusTransport, H: SensorHub> SensorDevice for Bno08x<'_, M, B, H> {
    async fn sample_fetch(&mut self, channel: SensorChannel) -> Result<(), SensorError> {
        if channel != SensorChannel::All {
            return Err(SensorError::NotSupported);
        }
        if !self.initialized {
            return Err(SensorError::NotInitialized);
        }

        self.hub.service(&mut self.samples).await?;

        // A hub reset drops every enabled report
        if self.samples.resets() != self.handled_resets {
            self.handled_resets = self.samples.resets();
            crate::log_warn!("BNO08X: re-enabling reports after hub reset");
            self.enable_reports().await?;
        }
        Ok(())
    }

    fn channel_get(&self, channel: SensorChannel) -> Result<ChannelReading, SensorError> {
        self.samples.get(channel)
    }
}
