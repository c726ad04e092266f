//! Mock platform implementation for testing
//!
//! Host-side stand-ins for the buses, pins, delay, hub HAL, ADC, microphone
//! and wireless link. Mocks that tests need to inspect after handing them to a
//! driver share their state through `Rc<RefCell<_>>`, so a clone kept by the
//! test sees everything the driver did.

#![cfg(test)]

mod adc;
mod audio;
mod bus;
mod delay;
mod gpio;
mod hub;
mod link;

pub use adc::MockAdc;
pub use audio::MockMic;
pub use bus::{BusTransaction, MockI2c, MockSpi};
pub use delay::MockDelay;
pub use gpio::{MockCtrlPin, MockIntPin};
pub use hub::MockHubHal;
pub use link::MockLink;
