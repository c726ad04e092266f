//! Communication Protocols
//!
//! - **SHTP**: length-prefixed packet exchange with the BNO08x sensor hub,
//!   plus the HAL adapter the hub stack runs on
//! - **Link**: contract of the wireless transport that carries frames to the
//!   host application and publishes the Battery Service level

pub mod link;
pub mod shtp;
