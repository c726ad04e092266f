//! GPIO Abstractions for BNO08x and motion-interrupt lines
//!
//! - H_INTN (host interrupt): active low, asserted when the hub has data or
//!   is ready to accept a write
//! - RST (reset): active low, holds the hub in reset
//! - PS0/WAKE: active low in SPI mode, requests the hub to wake up
//! - INT1/INT2 (motion chip): active low feature-event and data-ready lines
//!
//! Input lines implement [`IntPin`], output lines implement [`CtrlPin`].

/// Trait for an active-low interrupt/ready input with async edge detection
#[allow(async_fn_in_trait)]
pub trait IntPin {
    /// Wait for falling edge (line becomes asserted)
    async fn wait_for_falling_edge(&mut self);

    /// Check if the line is currently low (asserted)
    ///
    /// Non-blocking; safe to call from a polling loop.
    fn is_low(&self) -> bool;
}

/// Trait for an active-low control output (reset, wake)
pub trait CtrlPin {
    /// Drive the line low (assert)
    fn set_low(&mut self);

    /// Drive the line high (release)
    fn set_high(&mut self);
}

/// No-op INT pin for lines that are not wired
///
/// Reports the line as asserted so ready-polls pass through immediately.
/// `wait_for_falling_edge` never completes.
#[derive(Debug, Default)]
pub struct NoIntPin;

impl IntPin for NoIntPin {
    async fn wait_for_falling_edge(&mut self) {
        core::future::pending::<()>().await
    }

    fn is_low(&self) -> bool {
        true
    }
}

/// No-op control pin when the output is not wired
#[derive(Debug, Default)]
pub struct NoCtrlPin;

impl CtrlPin for NoCtrlPin {
    fn set_low(&mut self) {}

    fn set_high(&mut self) {}
}

// =============================================================================
// Embassy GPIO Implementations (RP2350)
// =============================================================================

/// INT pin implementation using Embassy GPIO
#[cfg(feature = "pico2_w")]
pub struct EmbassyIntPin<'d> {
    pin: embassy_rp::gpio::Input<'d>,
}

#[cfg(feature = "pico2_w")]
impl<'d> EmbassyIntPin<'d> {
    /// Create INT pin from Embassy GPIO input
    ///
    /// Configure the input with internal pull-up; the hub drives H_INTN
    /// open-drain.
    pub fn new(pin: embassy_rp::gpio::Input<'d>) -> Self {
        Self { pin }
    }
}

#[cfg(feature = "pico2_w")]
impl IntPin for EmbassyIntPin<'_> {
    async fn wait_for_falling_edge(&mut self) {
        self.pin.wait_for_falling_edge().await;
    }

    fn is_low(&self) -> bool {
        self.pin.is_low()
    }
}

/// Control pin implementation using Embassy GPIO
#[cfg(feature = "pico2_w")]
pub struct EmbassyCtrlPin<'d> {
    pin: embassy_rp::gpio::Output<'d>,
}

#[cfg(feature = "pico2_w")]
impl<'d> EmbassyCtrlPin<'d> {
    /// Create control pin from Embassy GPIO output
    ///
    /// Initialize the output high (not asserted).
    pub fn new(pin: embassy_rp::gpio::Output<'d>) -> Self {
        Self { pin }
    }
}

#[cfg(feature = "pico2_w")]
impl CtrlPin for EmbassyCtrlPin<'_> {
    fn set_low(&mut self) {
        self.pin.set_low();
    }

    fn set_high(&mut self) {
        self.pin.set_high();
    }
}
