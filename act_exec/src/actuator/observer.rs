//! Actuator event observers
//!
//! The actuator never writes to a global output. Everything it has to report
//! is passed as an [`ActuatorEvent`] to the [`Observer`] it was built with.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, error, info, warn};

// Internal
use super::{ActuatorError, ActuatorState};
use crate::calib::ResolutionMode;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A sink for actuator events.
pub trait Observer {
    /// Called synchronously each time the actuator has something to report.
    fn notify(&mut self, event: &ActuatorEvent<'_>);
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Events reported by the actuator.
#[derive(Debug)]
pub enum ActuatorEvent<'a> {
    /// A calibration table was loaded and swapped in.
    CalibLoaded {
        source: &'a str,
        num_samples: usize
    },

    /// Loading a calibration table failed, the previous table (if any) is
    /// still in use.
    CalibLoadFailed {
        source: &'a str,
        error: &'a ActuatorError
    },

    /// The actuator moved between states.
    StateChanged {
        from: ActuatorState,
        to: ActuatorState
    },

    /// The resolution mode was changed.
    ModeChanged(ResolutionMode),

    /// A commanded current was accepted.
    CurrentAccepted(f64),

    /// A commanded current was rejected.
    CurrentRejected {
        current: f64,
        error: &'a ActuatorError
    }
}

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Observer forwarding all events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

/// Observer discarding all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Observer for LogObserver {
    fn notify(&mut self, event: &ActuatorEvent<'_>) {
        match event {
            ActuatorEvent::CalibLoaded { source, num_samples } => info!(
                "Loaded {} calibration samples from {}", num_samples, source
            ),
            ActuatorEvent::CalibLoadFailed { source, error: e } => error!(
                "Could not load calibration from {}: {}", source, e
            ),
            ActuatorEvent::StateChanged { from, to } => info!(
                "Actuator state {:?} -> {:?}", from, to
            ),
            ActuatorEvent::ModeChanged(mode) => info!(
                "Resolution mode set to {}", mode
            ),
            ActuatorEvent::CurrentAccepted(current) => debug!(
                "Current set to {} A", current
            ),
            ActuatorEvent::CurrentRejected { current, error: e } => warn!(
                "Failed to set current to {} A: {}", current, e
            ),
        }
    }
}

impl Observer for NullObserver {
    fn notify(&mut self, _event: &ActuatorEvent<'_>) {}
}

#[cfg(test)]
mod test {
    use std::sync::Mutex;

    use log::{Level, LevelFilter, Log, Metadata, Record};

    use super::*;

    /// Target of the records emitted by `LogObserver`.
    const OBSERVER_TARGET: &str = "act_lib::actuator::observer";

    /// Logger keeping the level and message of `LogObserver` records.
    struct Capture {
        records: Mutex<Vec<(Level, String)>>
    }

    static CAPTURE: Capture = Capture {
        records: Mutex::new(Vec::new())
    };

    impl Log for Capture {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            if record.target() == OBSERVER_TARGET {
                if let Ok(mut r) = self.records.lock() {
                    r.push((record.level(), record.args().to_string()));
                }
            }
        }

        fn flush(&self) {}
    }

    #[test]
    fn test_log_observer_levels() {
        // Only this test installs a logger in this binary
        log::set_logger(&CAPTURE).unwrap();
        log::set_max_level(LevelFilter::Trace);

        let not_op = ActuatorError::NotOperational(ActuatorState::Error);
        let empty = ActuatorError::EmptyTable;

        let mut obs = LogObserver;
        obs.notify(&ActuatorEvent::CalibLoaded { source: "cal.csv", num_samples: 3 });
        obs.notify(&ActuatorEvent::CalibLoadFailed { source: "cal.csv", error: &empty });
        obs.notify(&ActuatorEvent::StateChanged {
            from: ActuatorState::Uninitialized,
            to: ActuatorState::Operational
        });
        obs.notify(&ActuatorEvent::ModeChanged(ResolutionMode::Interpolated));
        obs.notify(&ActuatorEvent::CurrentAccepted(0.5));
        obs.notify(&ActuatorEvent::CurrentRejected { current: 1.0, error: &not_op });

        let records = CAPTURE.records.lock().unwrap().clone();
        let levels: Vec<Level> = records.iter().map(|(l, _)| *l).collect();

        assert_eq!(levels, vec![
            Level::Info,
            Level::Error,
            Level::Info,
            Level::Info,
            Level::Debug,
            Level::Warn,
        ]);
        assert_eq!(records[0].1, "Loaded 3 calibration samples from cal.csv");
        assert_eq!(records[2].1, "Actuator state Uninitialized -> Operational");
        assert_eq!(records[3].1, "Resolution mode set to interpolated");
        assert_eq!(records[4].1, "Current set to 0.5 A");
    }
}
