//! Utility library for the actuator software
//!
//! Holds the ambient pieces shared by executables: session management,
//! logging, parameter loading and CSV archiving.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod archive;
pub mod host;
pub mod logger;
pub mod maths;
pub mod params;
pub mod session;
pub mod time;
