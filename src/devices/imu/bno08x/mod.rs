//! BNO08x 9-axis IMU with on-chip sensor fusion
//!
//! ## Layers
//!
//! - [`crate::communication::shtp::ShtpHal`]: reset, ready-line handshake and
//!   length-prefixed packets over the register bus
//! - [`Sh2Hub`]: sensor-hub commands and input-report decoding
//! - [`Bno08x`]: device API (`init`, `sample_fetch`, `channel_get`,
//!   `attr_set`)
//! - [`Bno08xTrigger`]: any-motion and data-ready interrupt dispatch
//!
//! ## Hardware
//!
//! - SPI (PS0/PS1 strapped) or I2C at 0x4A/0x4B
//! - H_INTN: active low, hub has data or can accept a write
//! - RST: active low reset
//! - PS0/WAKE: active low wake request (SPI only)
//! - INT1/INT2: motion feature and data-ready lines
//!
//! ## Usage
//!
//! ```ignore
//! use metabow::devices::bus::SpiBus;
//! use metabow::devices::imu::bno08x::{Bno08x, EmbassyCtrlPin, EmbassyIntPin, Sh2Hub};
//! use metabow::communication::shtp::ShtpHal;
//!
//! static BUS: Mutex<CriticalSectionRawMutex, SpiBus<Spi>> = ...;
//!
//! let hal = ShtpHal::new(
//!     &BUS,
//!     EmbassyIntPin::new(h_intn),
//!     EmbassyCtrlPin::new(rst),
//!     Some(EmbassyCtrlPin::new(wake)),
//!     Delay,
//!     EmbassyTime,
//!     ImuParams::default(),
//! );
//! let mut imu = Bno08x::new(&BUS, Sh2Hub::new(hal), ImuParams::default());
//! imu.init().await?;
//! ```

mod driver;
mod gpio;
mod hub;
mod registers;
mod reports;
mod samples;
mod trigger;

pub use driver::Bno08x;
#[cfg(feature = "pico2_w")]
pub use gpio::{EmbassyCtrlPin, EmbassyIntPin};
pub use gpio::{CtrlPin, IntPin, NoCtrlPin, NoIntPin};
pub use hub::{AsyncEvent, HubEventSink, SensorHub, Sh2Hub};
pub use registers::AnyMotionConfig;
pub use reports::{
    FeatureFlags, ProductIdResponse, ReportId, SensorConfig, SensorEvent, SensorValue,
};
pub use samples::{Orientation, SampleStore};
pub use trigger::{Bno08xTrigger, PendingIrq, TriggerLines, TriggerState};
