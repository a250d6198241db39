// Boxer Box — Punch & Round Core
//
// Everything here is hardware-independent so it builds and tests on the host.
// The board-specific glue (ADC, MAC lookup, logger) lives in the firmware
// binary.

pub mod clock;
pub mod config;
pub mod controller;
pub mod detector;
pub mod error;
pub mod events;
pub mod role;
pub mod timer;
pub mod transport;
