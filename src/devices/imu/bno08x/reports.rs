//! BNO08x Sensor Report Parsing
//!
//! Input reports arrive concatenated in one SHTP payload on the input
//! report channels. Each starts with its report ID; the length is fixed
//! per ID, so an unknown ID ends the walk.
//!
//! # Fixed-Point Formats
//!
//! - Q8: Accelerometer (m/s^2, scale = 1/256)
//! - Q9: Gyroscope angular velocity (rad/s, scale = 1/512)
//! - Q4: Magnetic field (µT, scale = 1/16)
//! - Q14: Quaternion components (scale = 1/16384)
//! - Q12: Rotation vector accuracy (radians, scale = 1/4096)
//!
//! # References
//!
//! - SH-2 Reference Manual, section 6.5: Sensor Reports

use bitflags::bitflags;
use nalgebra::{Quaternion, Vector3};

/// BNO08x report IDs used by this driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
#[repr(u8)]
pub enum ReportId {
    /// Accelerometer (calibrated, gravity included)
    Accelerometer = 0x01,
    /// Gyroscope Calibrated
    GyroscopeCalibrated = 0x02,
    /// Magnetic Field Calibrated
    MagneticFieldCalibrated = 0x03,
    /// Rotation Vector (quaternion with magnetometer)
    RotationVector = 0x05,
    /// Game Rotation Vector (quaternion without magnetometer)
    GameRotationVector = 0x08,
    /// Timestamp rebase
    TimestampRebase = 0xFA,
    /// Base timestamp reference
    BaseTimestamp = 0xFB,
    /// Product ID Response
    ProductIdResponse = 0xF8,
}

impl ReportId {
    /// Convert from raw byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Accelerometer),
            0x02 => Some(Self::GyroscopeCalibrated),
            0x03 => Some(Self::MagneticFieldCalibrated),
            0x05 => Some(Self::RotationVector),
            0x08 => Some(Self::GameRotationVector),
            0xFA => Some(Self::TimestampRebase),
            0xFB => Some(Self::BaseTimestamp),
            0xF8 => Some(Self::ProductIdResponse),
            _ => None,
        }
    }

    /// Length in bytes of one report with this ID inside an input payload
    pub fn report_len(self) -> usize {
        match self {
            Self::Accelerometer | Self::GyroscopeCalibrated | Self::MagneticFieldCalibrated => 10,
            Self::RotationVector => 14,
            Self::GameRotationVector => 12,
            Self::TimestampRebase | Self::BaseTimestamp => 5,
            Self::ProductIdResponse => ProductIdResponse::MIN_PAYLOAD_SIZE,
        }
    }
}

/// Q14 fixed-point scale factor (1/16384)
const Q14_SCALE: f32 = 1.0 / 16384.0;

/// Q12 fixed-point scale factor (1/4096)
const Q12_SCALE: f32 = 1.0 / 4096.0;

/// Q9 fixed-point scale factor (1/512)
const Q9_SCALE: f32 = 1.0 / 512.0;

/// Q8 fixed-point scale factor (1/256)
const Q8_SCALE: f32 = 1.0 / 256.0;

/// Q4 fixed-point scale factor (1/16)
const Q4_SCALE: f32 = 1.0 / 16.0;

/// Decoded sensor value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    /// Acceleration (m/s^2)
    Accelerometer(Vector3<f32>),
    /// Calibrated angular velocity (rad/s)
    GyroscopeCalibrated(Vector3<f32>),
    /// Calibrated magnetic field (µT)
    MagneticFieldCalibrated(Vector3<f32>),
    /// Orientation with accuracy estimate (rad)
    RotationVector {
        /// Unit quaternion (w = real)
        quaternion: Quaternion<f32>,
        /// Accuracy estimate in radians
        accuracy: f32,
    },
    /// Orientation without magnetometer
    GameRotationVector(Quaternion<f32>),
}

/// One decoded input report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorEvent {
    /// Report sequence number
    pub sequence: u8,
    /// Status byte; accuracy level in bits 1:0
    pub status: u8,
    /// Decoded value
    pub value: SensorValue,
}

impl SensorEvent {
    /// Status accuracy level (0 = unreliable .. 3 = high)
    pub fn accuracy_status(&self) -> u8 {
        self.status & 0x03
    }
}

fn read_i16(bytes: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn vector_q(bytes: &[u8], scale: f32) -> Vector3<f32> {
    Vector3::new(
        read_i16(bytes, 4) as f32 * scale,
        read_i16(bytes, 6) as f32 * scale,
        read_i16(bytes, 8) as f32 * scale,
    )
}

fn quaternion_q14(bytes: &[u8]) -> Quaternion<f32> {
    // Wire order is (i, j, k, real); nalgebra takes (w, i, j, k)
    Quaternion::new(
        read_i16(bytes, 10) as f32 * Q14_SCALE,
        read_i16(bytes, 4) as f32 * Q14_SCALE,
        read_i16(bytes, 6) as f32 * Q14_SCALE,
        read_i16(bytes, 8) as f32 * Q14_SCALE,
    )
}

/// Decode one sensor report
///
/// Common layout after the report ID: sequence, status, delay, then the
/// little-endian fixed-point fields from byte 4.
///
/// Returns `None` for non-sensor IDs or short input.
pub fn parse_sensor_report(bytes: &[u8]) -> Option<SensorEvent> {
    let id = ReportId::from_u8(*bytes.first()?)?;
    if bytes.len() < id.report_len() {
        return None;
    }

    let value = match id {
        ReportId::Accelerometer => SensorValue::Accelerometer(vector_q(bytes, Q8_SCALE)),
        ReportId::GyroscopeCalibrated => {
            SensorValue::GyroscopeCalibrated(vector_q(bytes, Q9_SCALE))
        }
        ReportId::MagneticFieldCalibrated => {
            SensorValue::MagneticFieldCalibrated(vector_q(bytes, Q4_SCALE))
        }
        ReportId::RotationVector => SensorValue::RotationVector {
            quaternion: quaternion_q14(bytes),
            accuracy: read_i16(bytes, 12) as f32 * Q12_SCALE,
        },
        ReportId::GameRotationVector => SensorValue::GameRotationVector(quaternion_q14(bytes)),
        _ => return None,
    };

    Some(SensorEvent {
        sequence: bytes[1],
        status: bytes[2],
        value,
    })
}

/// Walk a concatenated input-report payload
///
/// Timestamp records are skipped. Stops at the first unknown ID or
/// truncated report. Returns the number of events delivered.
pub fn walk_input_reports(payload: &[u8], mut on_event: impl FnMut(SensorEvent)) -> usize {
    let mut cursor = 0;
    let mut delivered = 0;

    while cursor < payload.len() {
        let rest = &payload[cursor..];
        let Some(id) = ReportId::from_u8(rest[0]) else {
            crate::log_trace!("BNO08x: unknown report 0x{:02X}, rest skipped", rest[0]);
            break;
        };
        let len = id.report_len();
        if rest.len() < len {
            crate::log_debug!("BNO08x: truncated report 0x{:02X}", rest[0]);
            break;
        }

        if let Some(event) = parse_sensor_report(&rest[..len]) {
            on_event(event);
            delivered += 1;
        }
        cursor += len;
    }

    delivered
}

/// BNO08x Product ID Response
///
/// Parsed from Report ID 0xF8 on the control channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "pico2_w", derive(defmt::Format))]
pub struct ProductIdResponse {
    /// Reset cause
    pub reset_cause: u8,
    /// Software version major
    pub sw_version_major: u8,
    /// Software version minor
    pub sw_version_minor: u8,
    /// Software part number
    pub sw_part_number: u32,
    /// Software build number
    pub sw_build_number: u32,
    /// Software version patch
    pub sw_version_patch: u16,
}

impl ProductIdResponse {
    /// Minimum payload size for a valid Product ID response
    pub const MIN_PAYLOAD_SIZE: usize = 16;

    /// Parse from SHTP payload bytes
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < Self::MIN_PAYLOAD_SIZE {
            return None;
        }
        if payload[0] != ReportId::ProductIdResponse as u8 {
            return None;
        }

        Some(Self {
            reset_cause: payload[1],
            sw_version_major: payload[2],
            sw_version_minor: payload[3],
            sw_part_number: u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]),
            sw_build_number: u32::from_le_bytes([payload[8], payload[9], payload[10], payload[11]]),
            sw_version_patch: u16::from_le_bytes([payload[12], payload[13]]),
        })
    }
}

/// SHTP Control Command IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlCommand {
    /// Set Feature Command - Enable/configure sensor reports
    SetFeature = 0xFD,
    /// Product ID Request
    ProductIdRequest = 0xF9,
}

bitflags! {
    /// Set Feature flags byte
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct FeatureFlags: u8 {
        /// Change sensitivity is relative rather than absolute
        const CHANGE_SENSITIVITY_RELATIVE = 0x01;
        /// Report only on change beyond the sensitivity
        const CHANGE_SENSITIVITY_ENABLED = 0x02;
        /// Wake the host on report
        const WAKEUP_ENABLED = 0x04;
        /// Keep running while the host sleeps
        const ALWAYS_ON = 0x08;
    }
}

/// Sensor report configuration (Set Feature contents)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorConfig {
    /// Option flags
    pub flags: FeatureFlags,
    /// Change sensitivity threshold
    pub change_sensitivity: u16,
    /// Report interval in microseconds (0 disables the report)
    pub report_interval_us: u32,
    /// Batch interval in microseconds
    pub batch_interval_us: u32,
    /// Sensor-specific configuration word
    pub sensor_specific: u32,
}

impl SensorConfig {
    /// Plain periodic report, every option off
    pub fn periodic(report_interval_us: u32) -> Self {
        Self {
            report_interval_us,
            ..Self::default()
        }
    }
}

/// Build a 17-byte "Set Feature Command" payload
pub fn build_set_feature_command(report_id: ReportId, config: &SensorConfig) -> [u8; 17] {
    let mut cmd = [0u8; 17];
    cmd[0] = ControlCommand::SetFeature as u8;
    cmd[1] = report_id as u8;
    cmd[2] = config.flags.bits();
    cmd[3..5].copy_from_slice(&config.change_sensitivity.to_le_bytes());
    cmd[5..9].copy_from_slice(&config.report_interval_us.to_le_bytes());
    cmd[9..13].copy_from_slice(&config.batch_interval_us.to_le_bytes());
    cmd[13..17].copy_from_slice(&config.sensor_specific.to_le_bytes());
    cmd
}

/// Build a Product ID Request payload
pub fn build_product_id_request() -> [u8; 2] {
    [ControlCommand::ProductIdRequest as u8, 0x00]
}
