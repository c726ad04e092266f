//! Latest decoded sample per report group
//!
//! Filled by the hub's event sink, read by `channel_get`. Each group keeps
//! only the most recent value; a group never received reads as `NoData`.

use nalgebra::{Quaternion, Vector3};

use super::hub::{AsyncEvent, HubEventSink};
use super::reports::{SensorEvent, SensorValue};
use crate::devices::traits::{ChannelReading, SensorChannel, SensorError};

/// Rotation vector with its accuracy estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    /// Unit quaternion (w = real)
    pub quaternion: Quaternion<f32>,
    /// Heading accuracy estimate (rad)
    pub accuracy: f32,
}

/// Per-group sample store
#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    accel: Option<Vector3<f32>>,
    gyro: Option<Vector3<f32>>,
    magn: Option<Vector3<f32>>,
    rotation: Option<Orientation>,
    game_rotation: Option<Quaternion<f32>>,
    events: u32,
    resets: u32,
}

impl SampleStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every sample (after a hub reset or re-init)
    pub fn clear(&mut self) {
        *self = Self {
            resets: self.resets,
            ..Self::default()
        };
    }

    /// Sensor events stored since creation
    pub fn events(&self) -> u32 {
        self.events
    }

    /// Hub resets observed since creation
    pub fn resets(&self) -> u32 {
        self.resets
    }

    /// Latest game rotation vector, if enabled and received
    pub fn game_rotation(&self) -> Option<Quaternion<f32>> {
        self.game_rotation
    }

    /// Values of one channel
    pub fn get(&self, channel: SensorChannel) -> Result<ChannelReading, SensorError> {
        use SensorChannel::*;

        match channel {
            AccelX | AccelY | AccelZ | AccelXyz => axis(self.accel, channel, AccelX),
            GyroX | GyroY | GyroZ | GyroXyz => axis(self.gyro, channel, GyroX),
            MagnX | MagnY | MagnZ | MagnXyz => axis(self.magn, channel, MagnX),
            RotationVecI | RotationVecJ | RotationVecK | RotationVecReal | RotationVecIjkr
            | RotationVecAccuracy => {
                let rv = self.rotation.ok_or(SensorError::NoData)?;
                let q = rv.quaternion;
                Ok(match channel {
                    RotationVecI => ChannelReading::scalar(q.i),
                    RotationVecJ => ChannelReading::scalar(q.j),
                    RotationVecK => ChannelReading::scalar(q.k),
                    RotationVecReal => ChannelReading::scalar(q.w),
                    RotationVecAccuracy => ChannelReading::scalar(rv.accuracy),
                    _ => ChannelReading::ijkr(&q),
                })
            }
            DieTemp | Pressure | All => Err(SensorError::NotSupported),
        }
    }
}

/// Select one axis (or all three) of a vector group
///
/// `first` is the X channel of the group; Y and Z follow it in declaration
/// order.
fn axis(
    value: Option<Vector3<f32>>,
    channel: SensorChannel,
    first: SensorChannel,
) -> Result<ChannelReading, SensorError> {
    let v = value.ok_or(SensorError::NoData)?;
    let index = channel as usize - first as usize;
    Ok(match index {
        0..=2 => ChannelReading::scalar(v[index]),
        _ => ChannelReading::vector(&v),
    })
}

impl HubEventSink for SampleStore {
    fn on_sensor_event(&mut self, event: &SensorEvent) {
        self.events = self.events.wrapping_add(1);
        match event.value {
            SensorValue::Accelerometer(v) => self.accel = Some(v),
            SensorValue::GyroscopeCalibrated(v) => self.gyro = Some(v),
            SensorValue::MagneticFieldCalibrated(v) => self.magn = Some(v),
            SensorValue::RotationVector {
                quaternion,
                accuracy,
            } => {
                self.rotation = Some(Orientation {
                    quaternion,
                    accuracy,
                })
            }
            SensorValue::GameRotationVector(q) => self.game_rotation = Some(q),
        }
    }

    fn on_async_event(&mut self, event: AsyncEvent) {
        match event {
            AsyncEvent::Reset => self.resets = self.resets.wrapping_add(1),
        }
    }
}
