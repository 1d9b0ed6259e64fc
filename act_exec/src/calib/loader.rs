//! Calibration CSV loader
//!
//! The calibration format is a single header line (ignored) followed by one
//! `current,position` sample per line. Extra trailing fields are ignored.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::io::{BufRead, BufReader, Read};
use csv::{ReaderBuilder, StringRecord, Trim};

// Internal
use super::{CalibError, CalibSample, CalibTable};

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Parse a calibration table from a CSV reader.
///
/// The first physical line is discarded whatever it contains. Lines missing
/// either field are skipped. Any field which is present but is not a finite
/// number aborts the whole load. Quotes have no special meaning.
pub fn parse<R: Read>(reader: R) -> Result<CalibTable, CalibError> {
    let mut reader = BufReader::new(reader);

    // Header bytes need not be valid UTF-8
    let mut header = Vec::new();
    reader.read_until(b'\n', &mut header).map_err(CalibError::Unreadable)?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(CalibError::CsvError)?;

        let (current, position) = match sample_fields(&record) {
            Some(f) => f,
            None => continue
        };

        // Positions count from the line after the header
        let line = record.position().map(|p| p.line() + 1).unwrap_or(0);

        samples.push(CalibSample {
            current: parse_number(current, line)?,
            position: parse_number(position, line)?,
        });
    }

    CalibTable::from_samples(samples)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the current and position fields of a record, or `None` if the record
/// doesn't have both.
///
/// An empty position is only treated as missing when it ends the line
/// (`1.0,`), an empty field between delimiters is malformed content.
fn sample_fields(record: &StringRecord) -> Option<(&str, &str)> {
    let current = record.get(0)?;
    let position = record.get(1)?;

    if position.is_empty() && record.len() == 2 {
        return None
    }

    Some((current, position))
}

fn parse_number(value: &str, line: u64) -> Result<f64, CalibError> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(CalibError::InvalidNumber {
            line,
            value: value.to_string()
        })
    }
}
