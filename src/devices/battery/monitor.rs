//! Battery monitor: shared state, immediate sampling and the periodic timer
//!
//! One instance per board, shared by reference between the timer task, the
//! transmit task and the Battery Service updater. The ADC and filter sit
//! behind an async mutex (held across the conversion); the published
//! reading sits behind a blocking mutex held only for a copy.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;

use super::{adc_to_soc, adc_to_voltage, BatteryAdc, BatteryError, MovingAverage};
use crate::parameters::BatteryParams;

/// Moving-average depth
pub const BATTERY_FILTER_DEPTH: usize = 8;

/// Published battery state, always updated as a whole
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct BatteryReading {
    /// Filtered ADC code
    pub raw: u16,
    /// Cell voltage (V)
    pub voltage: f32,
    /// State of charge (percent)
    pub soc: u8,
}

/// Outcome of one timer period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    /// Period elapsed and a sample was attempted
    Sampled,
    /// `sample_now` ran during the period; the period restarts
    Restarted,
}

struct Sampler<A> {
    adc: A,
    filter: MovingAverage<BATTERY_FILTER_DEPTH>,
}

/// Battery monitor
pub struct BatteryMonitor<M: RawMutex, A> {
    params: BatteryParams,
    initialized: AtomicBool,
    sampler: Mutex<M, Sampler<A>>,
    state: BlockingMutex<M, Cell<Option<BatteryReading>>>,
    restart: Signal<M, ()>,
}

impl<M: RawMutex, A: BatteryAdc> BatteryMonitor<M, A> {
    /// Create a monitor around an ADC channel
    pub const fn new(adc: A, params: BatteryParams) -> Self {
        Self {
            params,
            initialized: AtomicBool::new(false),
            sampler: Mutex::new(Sampler {
                adc,
                filter: MovingAverage::new(),
            }),
            state: BlockingMutex::new(Cell::new(None)),
            restart: Signal::new(),
        }
    }

    /// Configure the ADC channel; idempotent
    pub async fn init(&self) -> Result<(), BatteryError> {
        if self.is_initialized() {
            crate::log_warn!("Battery monitor already initialized");
            return Ok(());
        }

        let mut sampler = self.sampler.lock().await;
        sampler.adc.setup().await.map_err(|e| {
            crate::log_error!("Battery ADC channel setup failed: {:?}", e);
            BatteryError::Adc(e)
        })?;
        self.initialized.store(true, Ordering::Release);

        crate::log_info!("Battery monitor initialized");
        Ok(())
    }

    /// Whether `init` has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Sample immediately and restart the periodic timer
    pub async fn sample_now(&self) -> Result<BatteryReading, BatteryError> {
        if !self.is_initialized() {
            return Err(BatteryError::NotInitialized);
        }
        self.restart.signal(());
        self.sample().await
    }

    /// ADC read -> filter -> convert -> publish
    async fn sample(&self) -> Result<BatteryReading, BatteryError> {
        if !self.is_initialized() {
            return Err(BatteryError::NotInitialized);
        }

        let reading = {
            let mut sampler = self.sampler.lock().await;
            let raw = sampler.adc.read_raw().await.map_err(|e| {
                crate::log_error!("Battery ADC read failed: {:?}", e);
                BatteryError::Adc(e)
            })?;
            // Single-ended input can undershoot slightly below 0
            let code = raw.max(0) as u16;
            let filtered = sampler.filter.push(code);
            BatteryReading {
                raw: filtered,
                voltage: adc_to_voltage(filtered, &self.params),
                soc: adc_to_soc(filtered),
            }
        };

        self.state.lock(|cell| cell.set(Some(reading)));

        crate::log_info!(
            "Battery: ADC={}, Voltage={}V, SoC={}%",
            reading.raw,
            reading.voltage,
            reading.soc
        );
        Ok(reading)
    }

    /// Latest published reading, `None` before the first sample
    pub fn reading(&self) -> Option<BatteryReading> {
        self.state.lock(|cell| cell.get())
    }

    /// State of charge in percent, 0 before the first sample
    pub fn get_soc(&self) -> u8 {
        self.reading().map_or(0, |r| r.soc)
    }

    /// Cell voltage, 0.0 before the first sample
    pub fn get_voltage(&self) -> f32 {
        self.reading().map_or(0.0, |r| r.voltage)
    }

    /// Filtered ADC code, 0 before the first sample
    pub fn get_raw(&self) -> u16 {
        self.reading().map_or(0, |r| r.raw)
    }

    /// Wait one timer period of `period_ms`, sampling if it elapses
    pub async fn run_period<D: DelayNs>(&self, delay: &mut D, period_ms: u32) -> TimerOutcome {
        match select(delay.delay_ms(period_ms), self.restart.wait()).await {
            Either::First(()) => {
                // Errors are already logged; the next period retries
                let _ = self.sample().await;
                TimerOutcome::Sampled
            }
            Either::Second(()) => {
                crate::log_debug!("Battery timer restarted by immediate sample");
                TimerOutcome::Restarted
            }
        }
    }

    /// Periodic sampling task body
    ///
    /// First sample after `first_sample_delay_ms`, then every
    /// `sample_interval_ms`. `sample_now` cancels the pending period and the
    /// next one starts from the immediate sample.
    pub async fn run<D: DelayNs>(&self, mut delay: D) -> ! {
        let mut period_ms = self.params.first_sample_delay_ms;
        loop {
            self.run_period(&mut delay, period_ms).await;
            period_ms = self.params.sample_interval_ms;
        }
    }
}
