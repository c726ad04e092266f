//! Battery Service level updater
//!
//! Publishes the monitor's state of charge to the link's Battery Service:
//! once at boot, immediately on connect, then every
//! `battery_update_interval_ms` while connected. A disconnect stops the
//! periodic updates until the next connect. Failed updates are logged and
//! retried on the next period.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;

use crate::communication::link::{BatteryService, ConnHandle, LinkError, LinkEvent};
use crate::devices::battery::{BatteryAdc, BatteryMonitor};
use crate::parameters::LinkParams;

/// What one updater step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum UpdaterStep {
    /// Connect received; level published immediately
    Started(ConnHandle),
    /// Period elapsed while connected; level published
    Updated,
    /// Disconnect received; periodic updates stopped
    Stopped,
}

/// Battery Service updater task state
pub struct BatteryServiceUpdater<'a, M: RawMutex, A: BatteryAdc, S: BatteryService, D: DelayNs> {
    monitor: &'a BatteryMonitor<M, A>,
    service: S,
    events: &'a Signal<M, LinkEvent>,
    delay: D,
    interval_ms: u32,
    connection: Option<ConnHandle>,
}

impl<'a, M: RawMutex, A: BatteryAdc, S: BatteryService, D: DelayNs>
    BatteryServiceUpdater<'a, M, A, S, D>
{
    /// Create an updater listening on `events`
    pub fn new(
        monitor: &'a BatteryMonitor<M, A>,
        service: S,
        events: &'a Signal<M, LinkEvent>,
        delay: D,
        params: LinkParams,
    ) -> Self {
        Self {
            monitor,
            service,
            events,
            delay,
            interval_ms: params.battery_update_interval_ms,
            connection: None,
        }
    }

    /// Connection the updater is currently publishing for
    pub fn connection(&self) -> Option<ConnHandle> {
        self.connection
    }

    /// Take a first sample and publish the initial level
    pub async fn boot(&mut self) -> Result<u8, LinkError> {
        if let Err(e) = self.monitor.sample_now().await {
            crate::log_warn!("Initial battery sample failed: {:?}", e);
        }
        self.publish().await
    }

    /// Publish the current level
    pub async fn publish(&mut self) -> Result<u8, LinkError> {
        let level = self.monitor.get_soc();
        match self.service.set_battery_level(level).await {
            Ok(()) => {
                crate::log_info!(
                    "Battery Service updated: {}% ({}V)",
                    level,
                    self.monitor.get_voltage()
                );
                Ok(level)
            }
            Err(e) => {
                crate::log_warn!("Failed to update battery level: {:?}", e);
                Err(e)
            }
        }
    }

    fn handle(&mut self, event: LinkEvent) -> Option<UpdaterStep> {
        match event {
            LinkEvent::Connected(conn) => {
                self.connection = Some(conn);
                Some(UpdaterStep::Started(conn))
            }
            LinkEvent::Disconnected(_) if self.connection.is_some() => {
                self.connection = None;
                Some(UpdaterStep::Stopped)
            }
            LinkEvent::Disconnected(_) => None,
        }
    }

    /// Wait for the next link event or period and act on it
    pub async fn run_once(&mut self) -> UpdaterStep {
        loop {
            let step = if self.connection.is_some() {
                match select(self.events.wait(), self.delay.delay_ms(self.interval_ms)).await {
                    Either::First(event) => self.handle(event),
                    Either::Second(()) => Some(UpdaterStep::Updated),
                }
            } else {
                let event = self.events.wait().await;
                self.handle(event)
            };

            match step {
                Some(step @ (UpdaterStep::Started(_) | UpdaterStep::Updated)) => {
                    // Errors are logged; the next period retries
                    let _ = self.publish().await;
                    return step;
                }
                Some(step) => return step,
                None => continue,
            }
        }
    }

    /// Updater task body
    pub async fn run(&mut self) -> ! {
        loop {
            self.run_once().await;
        }
    }
}
