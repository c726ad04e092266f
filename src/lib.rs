#![cfg_attr(not(test), no_std)]

//! metabow - firmware core for a wearable motion and audio sensor
//!
//! This library provides the BNO08x sensor-hub driver, the trigger/interrupt
//! dispatch layer, the capture/transmit pipeline that fuses microphone audio
//! with motion records into fixed-size link frames, and battery estimation.

// Platform layer (errors, RP2350 adapters, host mocks)
pub mod platform;

// Core infrastructure (logging, time)
pub mod core;

// Packet transport and wireless link contracts
pub mod communication;

// Device drivers (bus transport, BNO08x, battery, microphone)
pub mod devices;

// Long-running tasks (capture, transmit, battery service)
pub mod subsystems;

// Compile-time configuration defaults
pub mod parameters;
