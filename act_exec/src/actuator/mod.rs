//! # Actuator module
//!
//! This module implements the [`Actuator`] state machine, which converts a
//! commanded coil current into a position using the actuator's calibration
//! table. The actuator is in one of the following states:
//!
//! - `Uninitialized` - Calibration is loaded but commands are not accepted.
//! - `Operational` - Commands are accepted and positions are resolved.
//! - `Error` - A fault is latched. Only a successful `initialize`, which
//!   reloads the calibration, leaves this state.
//! - `Unknown` - Reserved, never entered.
//!
//! The actuator is synchronous and holds no locks. A host driving it from
//! several threads must serialise access itself.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod observer;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use thiserror::Error;

// Internal
pub use observer::*;
use crate::{
    calib::{CalibError, CalibSource, CalibTable, FileSource, ResolutionMode},
    params::ActuatorParams
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// A current driven actuator.
pub struct Actuator<S: CalibSource = FileSource> {
    /// Where calibration tables are (re)loaded from.
    source: S,

    /// The active calibration table, `None` until a load succeeds.
    table: Option<CalibTable>,

    state: ActuatorState,

    mode: ResolutionMode,

    /// Last accepted current.
    ///
    /// Units: amps
    commanded_current: f64,

    /// The error which most recently put the actuator into `Error`.
    last_fault: Option<ActuatorError>,

    observer: Box<dyn Observer + Send>,
}

/// Snapshot of the actuator's status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    pub state: ActuatorState,
    pub mode: ResolutionMode,

    /// Units: amps
    pub commanded_current_a: f64,

    /// Units: millimeters
    pub position_mm: f64,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

/// Operational state of the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActuatorState {
    Uninitialized,
    Operational,
    Error,

    /// Reserved, no transition produces this state.
    Unknown
}

/// Errors reported by the actuator.
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("Failed to load the calibration table: {0}")]
    LoadFailure(CalibError),

    #[error("The calibration table contains no samples")]
    EmptyTable,

    #[error("Actuator is not operational (state = {0:?})")]
    NotOperational(ActuatorState),

    #[error("Current of {0} A is outside the calibrated range")]
    InvalidCurrent(f64)
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl From<CalibError> for ActuatorError {
    fn from(e: CalibError) -> Self {
        match e {
            CalibError::EmptyTable => ActuatorError::EmptyTable,
            e => ActuatorError::LoadFailure(e)
        }
    }
}

impl Actuator<FileSource> {
    /// Create an actuator from its parameters, reporting events to
    /// `observer`.
    pub fn from_params<O>(params: &ActuatorParams, observer: O) -> Self
    where
        O: Observer + Send + 'static
    {
        let mut act = Self::with_observer(params.calib_source(), observer);
        act.mode = params.mode;
        act
    }
}

impl<S: CalibSource> Actuator<S> {
    /// Create a new actuator which doesn't report any events.
    ///
    /// See [`Actuator::with_observer`].
    pub fn new(source: S) -> Self {
        Self::with_observer(source, NullObserver)
    }

    /// Create a new actuator, loading the calibration table from `source`.
    ///
    /// Construction never fails. If the table cannot be loaded the actuator
    /// starts in the `Error` state.
    pub fn with_observer<O>(source: S, observer: O) -> Self
    where
        O: Observer + Send + 'static
    {
        let mut act = Self {
            source,
            table: None,
            state: ActuatorState::Uninitialized,
            mode: ResolutionMode::default(),
            commanded_current: 0.0,
            last_fault: None,
            observer: Box::new(observer),
        };

        if let Err(e) = act.load_table() {
            act.latch_fault(e);
        }

        act
    }

    /// Set the position resolution mode, used from the next position query.
    pub fn set_mode(&mut self, mode: ResolutionMode) {
        self.mode = mode;
        self.observer.notify(&ActuatorEvent::ModeChanged(mode));
    }

    pub fn mode(&self) -> ResolutionMode {
        self.mode
    }

    /// Bring the actuator into the `Operational` state.
    ///
    /// Returns `false` if the actuator was in `Error` and the calibration
    /// could not be reloaded.
    pub fn initialize(&mut self) -> bool {
        self.try_initialize().is_ok()
    }

    /// Bring the actuator into the `Operational` state.
    ///
    /// From `Error` the calibration table is reloaded from the source first.
    /// If the reload fails the actuator stays in `Error` and keeps its
    /// previous table. On success the commanded current is reset to zero.
    pub fn try_initialize(&mut self) -> Result<(), ActuatorError> {
        if self.state == ActuatorState::Error {
            self.load_table()?;
            self.last_fault = None;
        }

        self.commanded_current = 0.0;
        self.set_state(ActuatorState::Operational);

        Ok(())
    }

    /// Command a new coil current, returning `true` if accepted.
    pub fn set_current(&mut self, current: f64) -> bool {
        self.try_set_current(current).is_ok()
    }

    /// Command a new coil current.
    ///
    /// Commands are only accepted while `Operational`. A current outside
    /// `[0, max calibrated current]` latches the `Error` state and leaves the
    /// commanded current unchanged.
    pub fn try_set_current(&mut self, current: f64) -> Result<(), ActuatorError> {
        if self.state != ActuatorState::Operational {
            let error = ActuatorError::NotOperational(self.state);
            self.observer.notify(&ActuatorEvent::CurrentRejected { current, error: &error });
            return Err(error)
        }

        if !self.is_current_valid(current) {
            let error = ActuatorError::InvalidCurrent(current);
            self.observer.notify(&ActuatorEvent::CurrentRejected { current, error: &error });
            self.latch_fault(ActuatorError::InvalidCurrent(current));
            return Err(error)
        }

        self.commanded_current = current;
        self.observer.notify(&ActuatorEvent::CurrentAccepted(current));

        Ok(())
    }

    /// Position for the commanded current.
    ///
    /// Always `0.0` unless the actuator is `Operational`.
    ///
    /// Units: millimeters
    pub fn position(&self) -> f64 {
        if self.state != ActuatorState::Operational {
            return 0.0
        }

        match self.table {
            Some(ref t) => t.resolve(self.commanded_current, self.mode),
            None => 0.0
        }
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    /// Reset the commanded current and return to `Uninitialized`.
    ///
    /// A latched fault survives a shutdown, in which case the state stays
    /// `Error`. Always returns `true`.
    pub fn shutdown(&mut self) -> bool {
        self.commanded_current = 0.0;

        if self.state != ActuatorState::Error {
            self.set_state(ActuatorState::Uninitialized);
        }

        true
    }

    /// Last accepted current, in amps.
    pub fn commanded_current(&self) -> f64 {
        self.commanded_current
    }

    /// The active calibration table, if one has been loaded.
    pub fn table(&self) -> Option<&CalibTable> {
        self.table.as_ref()
    }

    /// The error which put the actuator into `Error`, if it is faulted.
    pub fn last_fault(&self) -> Option<&ActuatorError> {
        self.last_fault.as_ref()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Get a snapshot of the actuator's status.
    pub fn status(&self) -> StatusReport {
        StatusReport {
            state: self.state,
            mode: self.mode,
            commanded_current_a: self.commanded_current,
            position_mm: self.position(),
        }
    }

    /// Load a new table from the source and swap it in.
    ///
    /// The active table is only replaced once the new one is complete.
    fn load_table(&mut self) -> Result<(), ActuatorError> {
        match self.source.load() {
            Ok(table) => {
                self.observer.notify(&ActuatorEvent::CalibLoaded {
                    source: self.source.name(),
                    num_samples: table.len()
                });
                self.table = Some(table);
                Ok(())
            },
            Err(e) => {
                let error = ActuatorError::from(e);
                self.observer.notify(&ActuatorEvent::CalibLoadFailed {
                    source: self.source.name(),
                    error: &error
                });
                Err(error)
            }
        }
    }

    fn is_current_valid(&self, current: f64) -> bool {
        match self.table {
            Some(ref t) => current >= 0.0 && current <= t.max_current(),
            None => false
        }
    }

    fn latch_fault(&mut self, error: ActuatorError) {
        self.last_fault = Some(error);
        self.set_state(ActuatorState::Error);
    }

    fn set_state(&mut self, to: ActuatorState) {
        if self.state != to {
            self.observer.notify(&ActuatorEvent::StateChanged {
                from: self.state,
                to
            });
            self.state = to;
        }
    }
}
