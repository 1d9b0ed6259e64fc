//! # Actuator library
//!
//! Calibration driven model of a current controlled actuator. The executable
//! in `main.rs` is a thin driver around the [`actuator::Actuator`] defined
//! here.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod actuator;
pub mod calib;
pub mod params;
