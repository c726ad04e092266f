//! Motion and data-ready triggers
//!
//! Two active-low lines feed one worker:
//!
//! - INT1: feature events; the worker reads `INT_STATUS_0` and runs the
//!   motion handler when the any-motion bit is set
//! - INT2: data ready; the worker runs the data-ready handler
//!
//! Edge watchers only set a bit in an atomic and signal the worker, so
//! they are safe to drive from interrupt context. Handler slots sit behind
//! a blocking mutex held just long enough to copy them in or out; handlers
//! run after the lock is released and register writes never happen under
//! it.

use core::cell::Cell;
use core::sync::atomic::{AtomicU8, Ordering};

use bitflags::bitflags;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use super::gpio::IntPin;
use super::registers::{
    AnyMotionConfig, FeatureReg, ANYMO_1, ANYMO_2, ANYMO_2_ENABLE, FEAT_PAGE, INT1_IO_CTRL,
    INT1_MAP_FEAT, INT2_IO_CTRL, INT_IO_CTRL_OUTPUT_EN, INT_MAP_ANY_MOTION,
    INT_MAP_DATA, INT_MAP_DATA_DRDY_INT2, INT_STATUS_0, INT_STATUS_ANY_MOTION,
};
use crate::devices::bus::BusTransport;
use crate::devices::traits::{SensorTrigger, TriggerError, TriggerHandler, TriggerType};
use crate::platform::Result as PlatformResult;

bitflags! {
    /// Interrupt lines waiting for the worker
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PendingIrq: u8 {
        /// INT1 feature event
        const FEATURE = 0x01;
        /// INT2 data ready
        const DATA_READY = 0x02;
    }
}

type Slot = Option<(TriggerHandler, SensorTrigger)>;

#[derive(Clone, Copy)]
struct Handlers {
    motion: Slot,
    data_ready: Slot,
}

/// Pending flags, worker wake-up and handler slots
///
/// Lives in a `static` so edge watchers, the worker and the application
/// can all reach it.
pub struct TriggerState<M: RawMutex> {
    pending: AtomicU8,
    wake: Signal<M, ()>,
    handlers: BlockingMutex<M, Cell<Handlers>>,
}

impl<M: RawMutex> TriggerState<M> {
    /// Empty state: nothing pending, no handlers
    pub const fn new() -> Self {
        Self {
            pending: AtomicU8::new(0),
            wake: Signal::new(),
            handlers: BlockingMutex::new(Cell::new(Handlers {
                motion: None,
                data_ready: None,
            })),
        }
    }

    /// Mark `irq` pending and wake the worker
    ///
    /// Lock-free and allocation-free; callable from interrupt context.
    pub fn raise(&self, irq: PendingIrq) {
        self.pending.fetch_or(irq.bits(), Ordering::AcqRel);
        self.wake.signal(());
    }

    /// Clear `irq` and report whether it was pending
    pub fn take(&self, irq: PendingIrq) -> bool {
        let prev = self.pending.fetch_and(!irq.bits(), Ordering::AcqRel);
        prev & irq.bits() != 0
    }

    /// Lines currently pending
    pub fn pending(&self) -> PendingIrq {
        PendingIrq::from_bits_truncate(self.pending.load(Ordering::Acquire))
    }

    /// Wait for one active edge on `pin` and raise `irq`
    pub async fn watch_edge_once<P: IntPin>(&self, pin: &mut P, irq: PendingIrq) {
        pin.wait_for_falling_edge().await;
        self.raise(irq);
    }

    /// Edge watcher task body for one line
    pub async fn watch_line<P: IntPin>(&self, mut pin: P, irq: PendingIrq) -> ! {
        loop {
            self.watch_edge_once(&mut pin, irq).await;
        }
    }

    fn slot(&self, kind: TriggerType) -> Slot {
        let handlers = self.handlers.lock(|cell| cell.get());
        match kind {
            TriggerType::Motion => handlers.motion,
            _ => handlers.data_ready,
        }
    }

    fn set_slot(&self, kind: TriggerType, slot: Slot) {
        self.handlers.lock(|cell| {
            let mut handlers = cell.get();
            match kind {
                TriggerType::Motion => handlers.motion = slot,
                _ => handlers.data_ready = slot,
            }
            cell.set(handlers);
        });
    }

    /// Whether a handler is registered for `kind`
    pub fn has_handler(&self, kind: TriggerType) -> bool {
        self.slot(kind).is_some()
    }
}

impl<M: RawMutex> Default for TriggerState<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which interrupt lines are wired to the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerLines {
    /// INT1 (feature events)
    pub int1: bool,
    /// INT2 (data ready)
    pub int2: bool,
}

impl TriggerLines {
    /// Both lines wired
    pub const fn both() -> Self {
        Self {
            int1: true,
            int2: true,
        }
    }
}

/// Trigger front end for one motion chip
///
/// # Example
///
/// ```ignore
/// static TRIGGERS: TriggerState<CriticalSectionRawMutex> = TriggerState::new();
///
/// let trig = Bno08xTrigger::new(&BUS, &TRIGGERS, TriggerLines::both());
/// trig.init_interrupts().await?;
/// spawner.spawn(int1_task(int1_pin))?; // TRIGGERS.watch_line(pin, PendingIrq::FEATURE)
/// trig.set_trigger(SensorTrigger::new(TriggerType::Motion), Some(on_motion)).await?;
/// trig.run().await;
/// ```
pub struct Bno08xTrigger<'a, M: RawMutex, B: BusTransport> {
    bus: &'a Mutex<M, B>,
    state: &'a TriggerState<M>,
    lines: TriggerLines,
    any_motion: AnyMotionConfig,
}

impl<'a, M: RawMutex, B: BusTransport> Bno08xTrigger<'a, M, B> {
    /// Create with the default any-motion settings
    pub fn new(bus: &'a Mutex<M, B>, state: &'a TriggerState<M>, lines: TriggerLines) -> Self {
        Self::with_any_motion(bus, state, lines, AnyMotionConfig::default())
    }

    /// Create with explicit any-motion settings
    pub fn with_any_motion(
        bus: &'a Mutex<M, B>,
        state: &'a TriggerState<M>,
        lines: TriggerLines,
        any_motion: AnyMotionConfig,
    ) -> Self {
        Self {
            bus,
            state,
            lines,
            any_motion,
        }
    }

    /// Shared trigger state
    pub fn state(&self) -> &'a TriggerState<M> {
        self.state
    }

    async fn reg_write(&self, reg: u8, value: u8) -> PlatformResult<()> {
        self.bus.lock().await.write(&[reg, value]).await
    }

    async fn feature_write(&self, reg: FeatureReg, value: u16) -> PlatformResult<()> {
        self.reg_write(FEAT_PAGE, reg.page).await?;
        crate::log_debug!("feature reg[0x{:02X}]@{} = 0x{:04X}", reg.addr, reg.page, value);
        let [lo, hi] = value.to_le_bytes();
        self.bus.lock().await.write(&[reg.addr, lo, hi]).await
    }

    async fn read_int_status(&self) -> PlatformResult<u16> {
        let mut buf = [0u8; 2];
        self.bus.lock().await.read(INT_STATUS_0, &mut buf).await?;
        Ok(u16::from_le_bytes(buf))
    }

    /// Enable the push-pull output of every wired line
    pub async fn init_interrupts(&self) -> Result<(), TriggerError> {
        for (wired, reg, name) in [
            (self.lines.int1, INT1_IO_CTRL, "INT1"),
            (self.lines.int2, INT2_IO_CTRL, "INT2"),
        ] {
            if !wired {
                continue;
            }
            self.reg_write(reg, INT_IO_CTRL_OUTPUT_EN)
                .await
                .map_err(|e| {
                    crate::log_error!("failed configuring {}_IO_CTRL: {:?}", name, e);
                    TriggerError::Bus
                })?;
        }
        Ok(())
    }

    async fn any_motion_config(&self, enable: bool) -> PlatformResult<()> {
        if enable {
            self.feature_write(ANYMO_1, self.any_motion.anymo_1).await?;
        }

        let mut anymo_2 = self.any_motion.anymo_2;
        if enable {
            anymo_2 |= ANYMO_2_ENABLE;
        }
        self.feature_write(ANYMO_2, anymo_2).await?;

        let map = if enable { INT_MAP_ANY_MOTION } else { 0 };
        self.reg_write(INT1_MAP_FEAT, map).await
    }

    async fn data_ready_config(&self, enable: bool) -> PlatformResult<()> {
        let map = if enable { INT_MAP_DATA_DRDY_INT2 } else { 0 };
        self.reg_write(INT_MAP_DATA, map).await
    }

    async fn configure(&self, kind: TriggerType, enable: bool) -> PlatformResult<()> {
        match kind {
            TriggerType::Motion => self.any_motion_config(enable).await,
            _ => self.data_ready_config(enable).await,
        }
    }

    /// Register (`Some`) or remove (`None`) the handler for a trigger
    ///
    /// Motion needs INT1 and data-ready needs INT2; anything else is
    /// `NotSupported` without touching the bus. If enabling fails the
    /// handler is removed again and the trigger is left disabled.
    pub async fn set_trigger(
        &self,
        trigger: SensorTrigger,
        handler: Option<TriggerHandler>,
    ) -> Result<(), TriggerError> {
        let wired = match trigger.kind {
            TriggerType::Motion => self.lines.int1,
            TriggerType::DataReady => self.lines.int2,
            _ => false,
        };
        if !wired {
            return Err(TriggerError::NotSupported);
        }

        let enable = handler.is_some();
        self.state
            .set_slot(trigger.kind, handler.map(|h| (h, trigger)));

        match self.configure(trigger.kind, enable).await {
            Ok(()) => Ok(()),
            Err(e) => {
                crate::log_error!("{:?} trigger configuration failed: {:?}", trigger.kind, e);
                if enable {
                    self.state.set_slot(trigger.kind, None);
                    // Best effort: leave no half-enabled feature behind
                    let _ = self.configure(trigger.kind, false).await;
                }
                Err(TriggerError::Bus)
            }
        }
    }

    /// Service every pending line once
    ///
    /// Returns the number of handlers invoked.
    pub async fn process_pending(&self) -> usize {
        let mut invoked = 0;

        if self.state.take(PendingIrq::FEATURE) {
            match self.read_int_status().await {
                Ok(status) => {
                    if let Some((handler, trigger)) = self.state.slot(TriggerType::Motion) {
                        if status & INT_STATUS_ANY_MOTION != 0 {
                            handler(&trigger);
                            invoked += 1;
                        }
                    }
                }
                Err(e) => crate::log_error!("read interrupt status failed: {:?}", e),
            }
        }

        if self.state.take(PendingIrq::DATA_READY) {
            if let Some((handler, trigger)) = self.state.slot(TriggerType::DataReady) {
                handler(&trigger);
                invoked += 1;
            }
        }

        invoked
    }

    /// Wait for a wake-up and service the pending lines
    pub async fn run_once(&self) -> usize {
        self.state.wake.wait().await;
        self.process_pending().await
    }

    /// Trigger worker task body
    pub async fn run(&self) -> ! {
        loop {
            self.run_once().await;
        }
    }
}
