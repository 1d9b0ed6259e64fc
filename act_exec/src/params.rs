//! # Actuator parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;
use serde::Deserialize;

use crate::calib::{FileSource, ResolutionMode};
use util::host;

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Parameters for a single actuator.
#[derive(Debug, Clone, Deserialize)]
pub struct ActuatorParams {
    /// Path to the calibration CSV file, relative to `$ACT_SW_ROOT` unless
    /// absolute.
    pub calib_file: String,

    /// Position resolution mode to start in.
    #[serde(default)]
    pub mode: ResolutionMode,
}

/// Parameters for the actuator executable.
#[derive(Debug, Clone, Deserialize)]
pub struct ActExecParams {
    pub actuator: ActuatorParams,

    /// Currents to command in order during the sweep.
    ///
    /// Units: amps
    pub sweep_currents_a: Vec<f64>,

    /// Out of range current used to demonstrate a latched fault.
    ///
    /// Units: amps
    pub fault_current_a: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ActuatorParams {
    /// Get the calibration source described by these parameters.
    ///
    /// If `$ACT_SW_ROOT` is not set relative paths are used as they are.
    pub fn calib_source(&self) -> FileSource {
        let path = host::resolve_path(&self.calib_file)
            .unwrap_or_else(|_| PathBuf::from(&self.calib_file));

        FileSource::new(path)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exec_params() {
        let p: ActExecParams = util::params::from_str(r#"
            sweep_currents_a = [0.1, 0.5, 2.5]
            fault_current_a = -1.0

            [actuator]
            calib_file = "data/calibration.csv"
            mode = "interpolated"
        "#).unwrap();

        assert_eq!(p.actuator.calib_file, "data/calibration.csv");
        assert_eq!(p.actuator.mode, ResolutionMode::Interpolated);
        assert_eq!(p.sweep_currents_a, vec![0.1, 0.5, 2.5]);
        assert_eq!(p.fault_current_a, -1.0);
    }

    #[test]
    fn test_mode_defaults_to_nearest() {
        let p: ActuatorParams = util::params::from_str(
            "calib_file = \"/abs/calibration.csv\"\n"
        ).unwrap();

        assert_eq!(p.mode, ResolutionMode::Nearest);
        assert_eq!(
            p.calib_source().path(),
            std::path::Path::new("/abs/calibration.csv")
        );
    }
}
