//! Motion record: one fused orientation plus raw motion sample

use crate::devices::traits::{SensorChannel, SensorDevice, SensorError};

/// Values per record
pub const MOTION_VALUES: usize = 13;

/// Serialized record size (13 little-endian `f32`)
pub const MOTION_RECORD_SIZE: usize = MOTION_VALUES * core::mem::size_of::<f32>();

/// Channel groups read per record, in wire order
const GROUPS: [SensorChannel; 4] = [
    SensorChannel::RotationVecIjkr,
    SensorChannel::AccelXyz,
    SensorChannel::GyroXyz,
    SensorChannel::MagnXyz,
];

/// One motion record
///
/// Wire order: quaternion (i, j, k, real), accelerometer (x, y, z),
/// gyroscope (x, y, z), magnetometer (x, y, z).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct MotionRecord {
    /// Rotation vector (i, j, k, real)
    pub quaternion: [f32; 4],
    /// Acceleration (m/s^2)
    pub accel: [f32; 3],
    /// Angular velocity (rad/s)
    pub gyro: [f32; 3],
    /// Magnetic field (µT)
    pub magn: [f32; 3],
}

impl MotionRecord {
    /// Read all four groups from `sensor`
    ///
    /// Either every group is read or the record is discarded; the error
    /// names the first group that failed.
    pub fn capture<S: SensorDevice>(sensor: &S) -> Result<Self, (SensorChannel, SensorError)> {
        let mut values = [0.0f32; MOTION_VALUES];
        let mut offset = 0;

        for channel in GROUPS {
            let reading = sensor.channel_get(channel).map_err(|e| (channel, e))?;
            let group = reading.values();
            let end = offset + group.len();
            if end > MOTION_VALUES {
                return Err((channel, SensorError::InvalidValue));
            }
            values[offset..end].copy_from_slice(group);
            offset = end;
        }

        if offset != MOTION_VALUES {
            return Err((SensorChannel::All, SensorError::InvalidValue));
        }
        Ok(Self::from_values(&values))
    }

    /// Build from values in wire order
    pub fn from_values(v: &[f32; MOTION_VALUES]) -> Self {
        Self {
            quaternion: [v[0], v[1], v[2], v[3]],
            accel: [v[4], v[5], v[6]],
            gyro: [v[7], v[8], v[9]],
            magn: [v[10], v[11], v[12]],
        }
    }

    /// Values in wire order
    pub fn values(&self) -> [f32; MOTION_VALUES] {
        let mut v = [0.0f32; MOTION_VALUES];
        v[..4].copy_from_slice(&self.quaternion);
        v[4..7].copy_from_slice(&self.accel);
        v[7..10].copy_from_slice(&self.gyro);
        v[10..].copy_from_slice(&self.magn);
        v
    }

    /// Serialize into `dst`
    pub fn write_to(&self, dst: &mut [u8; MOTION_RECORD_SIZE]) {
        for (chunk, value) in dst.chunks_exact_mut(4).zip(self.values()) {
            chunk.copy_from_slice(&value.to_le_bytes());
        }
    }

    /// Deserialize from `src`
    pub fn read_from(src: &[u8; MOTION_RECORD_SIZE]) -> Self {
        let mut v = [0.0f32; MOTION_VALUES];
        for (value, chunk) in v.iter_mut().zip(src.chunks_exact(4)) {
            *value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self::from_values(&v)
    }
}
