//! # Calibration module
//!
//! This module holds the calibration table of the actuator, the measured
//! correspondence between the commanded coil current and the resulting
//! position, along with the sources it can be loaded from and the algorithms
//! used to resolve a position from a current.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod loader;
mod resolve;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::fs::File;
use std::path::{Path, PathBuf};
use ordered_float::OrderedFloat;
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use loader::parse;
pub use resolve::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single measured calibration point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibSample {
    /// Coil current.
    ///
    /// Units: amps
    pub current: f64,

    /// Actuator position produced by `current`.
    ///
    /// Units: millimeters
    pub position: f64,
}

/// The calibration table of an actuator.
///
/// A table is never empty, is sorted ascending by current (then by
/// position), and holds no two samples with the same current.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibTable {
    samples: Vec<CalibSample>
}

/// A calibration source backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

/// A calibration source backed by text held in memory.
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    text: String,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A named resource that calibration tables can be loaded from.
///
/// Loading may be repeated, each call must build a fresh table.
pub trait CalibSource {
    /// Human readable identifier of the source, used in events and logs.
    fn name(&self) -> &str;

    /// Load a complete calibration table from the source.
    fn load(&self) -> Result<CalibTable, CalibError>;
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors that can occur while loading a calibration table.
#[derive(Debug, Error)]
pub enum CalibError {
    #[error("Cannot open the calibration source: {0}")]
    Unreadable(std::io::Error),

    #[error("Cannot read the calibration data: {0}")]
    CsvError(csv::Error),

    #[error("Invalid number on line {line}: {value:?}")]
    InvalidNumber {
        line: u64,
        value: String
    },

    #[error("More than one sample has a current of {0} A")]
    DuplicateCurrent(f64),

    #[error("The calibration source contains no samples")]
    EmptyTable
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CalibTable {
    /// Build a table from an unordered set of samples.
    ///
    /// The samples are sorted by current then position. Returns an error if
    /// there are no samples or if two samples share a current.
    pub fn from_samples(mut samples: Vec<CalibSample>) -> Result<Self, CalibError> {
        if samples.is_empty() {
            return Err(CalibError::EmptyTable)
        }

        samples.sort_by_key(|s| (OrderedFloat(s.current), OrderedFloat(s.position)));

        if let Some(w) = samples.windows(2).find(|w| w[0].current == w[1].current) {
            return Err(CalibError::DuplicateCurrent(w[0].current))
        }

        Ok(Self { samples })
    }

    /// All samples in ascending current order.
    pub fn samples(&self) -> &[CalibSample] {
        &self.samples
    }

    /// Number of samples in the table.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`, tables cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The sample with the lowest current.
    pub fn first(&self) -> &CalibSample {
        &self.samples[0]
    }

    /// The sample with the highest current.
    pub fn last(&self) -> &CalibSample {
        &self.samples[self.samples.len() - 1]
    }

    /// The highest calibrated current.
    pub fn max_current(&self) -> f64 {
        self.last().current
    }
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();

        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalibSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<CalibTable, CalibError> {
        let file = File::open(&self.path).map_err(CalibError::Unreadable)?;
        parse(file)
    }
}

impl TextSource {
    pub fn new<N: Into<String>, T: Into<String>>(name: N, text: T) -> Self {
        Self {
            name: name.into(),
            text: text.into()
        }
    }
}

impl CalibSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Result<CalibTable, CalibError> {
        parse(self.text.as_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample(current: f64, position: f64) -> CalibSample {
        CalibSample { current, position }
    }

    #[test]
    fn test_from_samples_sorts() {
        let table = CalibTable::from_samples(vec![
            sample(2.0, 20.0),
            sample(0.0, 0.0),
            sample(1.0, 10.0),
        ]).unwrap();

        assert_eq!(
            table.samples(),
            &[sample(0.0, 0.0), sample(1.0, 10.0), sample(2.0, 20.0)]
        );
        assert_eq!(table.first(), &sample(0.0, 0.0));
        assert_eq!(table.max_current(), 2.0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_from_samples_rejects() {
        match CalibTable::from_samples(vec![]) {
            Err(CalibError::EmptyTable) => (),
            r => panic!("Expected an empty table error, got {:?}", r)
        }

        match CalibTable::from_samples(vec![sample(1.0, 3.0), sample(1.0, 2.0)]) {
            Err(CalibError::DuplicateCurrent(c)) => assert_eq!(c, 1.0),
            r => panic!("Expected a duplicate current error, got {:?}", r)
        }
    }

    #[test]
    fn test_missing_file() {
        let source = FileSource::new("/definitely/not/a/calibration.csv");
        assert_eq!(source.name(), "/definitely/not/a/calibration.csv");

        match source.load() {
            Err(CalibError::Unreadable(_)) => (),
            r => panic!("Expected an unreadable error, got {:?}", r)
        }
    }
}
