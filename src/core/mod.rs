//! Core firmware infrastructure
//!
//! Logging macros and the time abstraction shared by every subsystem.

pub mod logging;
pub mod traits;
