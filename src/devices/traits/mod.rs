//! Device traits
//!
//! Hardware-independent sensor API. The capture pipeline depends only on
//! these, so it can run against mocks on the host.

pub mod sensor;

pub use sensor::{
    ChannelReading, SensorAttribute, SensorChannel, SensorDevice, SensorError, SensorTrigger,
    TriggerError, TriggerHandler, TriggerType,
};
