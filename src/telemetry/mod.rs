//! Device telemetry normalization.
//!
//! Turns the path-addressed parameter tree served by the device-management
//! server into typed [`DeviceInfo`] and [`ConnectedDevice`] views. Missing
//! telemetry is never an error: each field degrades to its own default.

mod device;
pub mod paths;
mod tree;


pub use device::*;
pub use tree::{extract, Leaf, Param, ParameterTree};
