//! Sensor API: channels, readings, attributes and triggers
//!
//! ## Usage
//!
//! ```ignore
//! use metabow::devices::traits::{SensorChannel, SensorDevice};
//!
//! async fn read_accel<S: SensorDevice>(sensor: &mut S) -> Result<(), SensorError> {
//!     sensor.sample_fetch(SensorChannel::All).await?;
//!     let accel = sensor.channel_get(SensorChannel::AccelXyz)?;
//!     // accel.values() == [x, y, z] in m/s^2
//!     Ok(())
//! }
//! ```

use core::fmt;

use nalgebra::{Quaternion, Vector3};

/// Sensor channels
///
/// Only some are backed by a given driver; the rest report
/// [`SensorError::NotSupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum SensorChannel {
    /// Acceleration X (m/s^2)
    AccelX,
    /// Acceleration Y (m/s^2)
    AccelY,
    /// Acceleration Z (m/s^2)
    AccelZ,
    /// Acceleration X, Y, Z
    AccelXyz,
    /// Angular velocity X (rad/s)
    GyroX,
    /// Angular velocity Y (rad/s)
    GyroY,
    /// Angular velocity Z (rad/s)
    GyroZ,
    /// Angular velocity X, Y, Z
    GyroXyz,
    /// Magnetic field X (µT)
    MagnX,
    /// Magnetic field Y (µT)
    MagnY,
    /// Magnetic field Z (µT)
    MagnZ,
    /// Magnetic field X, Y, Z
    MagnXyz,
    /// Rotation vector i
    RotationVecI,
    /// Rotation vector j
    RotationVecJ,
    /// Rotation vector k
    RotationVecK,
    /// Rotation vector real part
    RotationVecReal,
    /// Rotation vector i, j, k, real
    RotationVecIjkr,
    /// Rotation vector accuracy estimate (rad)
    RotationVecAccuracy,
    /// Die temperature
    DieTemp,
    /// Barometric pressure
    Pressure,
    /// Every channel the device supports
    All,
}

impl SensorChannel {
    /// Accelerometer channels (any axis or grouped)
    pub fn is_accel(self) -> bool {
        matches!(self, Self::AccelX | Self::AccelY | Self::AccelZ | Self::AccelXyz)
    }

    /// Gyroscope channels (any axis or grouped)
    pub fn is_gyro(self) -> bool {
        matches!(self, Self::GyroX | Self::GyroY | Self::GyroZ | Self::GyroXyz)
    }
}

/// Sensor attributes settable through `attr_set`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum SensorAttribute {
    /// Output data rate (Hz)
    SamplingFrequency,
    /// Oversampling ratio
    Oversampling,
    /// Full-scale range
    FullScale,
}

/// Sensor driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum SensorError {
    /// Channel, attribute or operation not provided by this device
    NotSupported,
    /// Channel has not produced a sample yet
    NoData,
    /// Device `init` has not completed
    NotInitialized,
    /// Bus missing, not ready or failed
    Bus,
    /// Sensor hub did not respond as expected
    Hub,
    /// Attribute value out of range
    InvalidValue,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::NotSupported => write!(f, "Not supported"),
            SensorError::NoData => write!(f, "No data available"),
            SensorError::NotInitialized => write!(f, "Sensor not initialized"),
            SensorError::Bus => write!(f, "Bus error"),
            SensorError::Hub => write!(f, "Sensor hub error"),
            SensorError::InvalidValue => write!(f, "Invalid attribute value"),
        }
    }
}

/// Values of one channel (1 to 4 components)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelReading {
    values: [f32; 4],
    len: usize,
}

impl ChannelReading {
    /// Single-value channel
    pub fn scalar(value: f32) -> Self {
        Self {
            values: [value, 0.0, 0.0, 0.0],
            len: 1,
        }
    }

    /// Three-axis channel
    pub fn vector(v: &Vector3<f32>) -> Self {
        Self {
            values: [v.x, v.y, v.z, 0.0],
            len: 3,
        }
    }

    /// Quaternion in (i, j, k, real) order
    pub fn ijkr(q: &Quaternion<f32>) -> Self {
        Self {
            values: [q.i, q.j, q.k, q.w],
            len: 4,
        }
    }

    /// Component values
    pub fn values(&self) -> &[f32] {
        &self.values[..self.len]
    }

    /// First component
    pub fn first(&self) -> f32 {
        self.values[0]
    }
}

/// Sensor driver API used by the capture pipeline
#[allow(async_fn_in_trait)]
pub trait SensorDevice {
    /// Pull fresh samples from the device into the driver
    async fn sample_fetch(&mut self, channel: SensorChannel) -> Result<(), SensorError>;

    /// Latest values of `channel`
    fn channel_get(&self, channel: SensorChannel) -> Result<ChannelReading, SensorError>;
}

/// Trigger kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum TriggerType {
    /// Any-motion feature event (feature interrupt line)
    Motion,
    /// New sample available (data-ready line)
    DataReady,
    /// Periodic timer
    Timer,
    /// Threshold crossing
    Threshold,
    /// Single tap
    Tap,
    /// Double tap
    DoubleTap,
}

/// Trigger descriptor passed back to the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct SensorTrigger {
    /// Event kind
    pub kind: TriggerType,
    /// Channel the event relates to
    pub channel: SensorChannel,
}

impl SensorTrigger {
    /// Trigger on every channel
    pub const fn new(kind: TriggerType) -> Self {
        Self {
            kind,
            channel: SensorChannel::All,
        }
    }
}

/// Trigger callback, invoked from the trigger worker task
pub type TriggerHandler = fn(&SensorTrigger);

/// Trigger registration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub enum TriggerError {
    /// Trigger kind unknown or its interrupt line is not wired
    NotSupported,
    /// Register writes failed; the trigger is left disabled
    Bus,
}

impl fmt::Display for TriggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerError::NotSupported => write!(f, "Trigger not supported"),
            TriggerError::Bus => write!(f, "Trigger register access failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_reading_shapes() {
        let s = ChannelReading::scalar(1.5);
        assert_eq!(s.values(), &[1.5]);

        let v = ChannelReading::vector(&Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(v.values(), &[1.0, 2.0, 3.0]);

        // nalgebra stores (w, i, j, k); readings are (i, j, k, real)
        let q = ChannelReading::ijkr(&Quaternion::new(0.5, 0.1, 0.2, 0.3));
        assert_eq!(q.values(), &[0.1, 0.2, 0.3, 0.5]);
        assert_eq!(q.first(), 0.1);
    }

    #[test]
    fn test_channel_groups() {
        assert!(SensorChannel::AccelY.is_accel());
        assert!(SensorChannel::GyroXyz.is_gyro());
        assert!(!SensorChannel::MagnX.is_accel());
        assert!(!SensorChannel::All.is_gyro());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", SensorError::NotSupported), "Not supported");
        assert_eq!(format!("{}", TriggerError::Bus), "Trigger register access failed");
    }
}
