//! Core traits for platform-agnostic firmware functionality.
//!
//! # Features
//!
//! - **`embassy`**: Enables `EmbassyTime`, backed by `embassy_time::Instant`
//! - `MockTime` is available in test builds

pub mod time;

pub use time::TimeSource;

#[cfg(test)]
pub use time::MockTime;

#[cfg(feature = "embassy")]
pub use time::EmbassyTime;
