//! Position resolution from a calibration table

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Internal
use super::{CalibSample, CalibTable};
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The algorithm used to map a current onto a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Use the position of the sample whose current is closest to the query.
    Nearest,

    /// Linearly interpolate between the two samples bracketing the query.
    Interpolated
}

#[derive(Debug, Error)]
#[error("Unknown resolution mode {0:?}, expected \"nearest\" or \"interpolated\"")]
pub struct ParseModeError(String);

/// Where a query current falls relative to the table.
enum Bracket<'a> {
    /// At or below the lowest calibrated current.
    Low(&'a CalibSample),

    /// Above the highest calibrated current.
    High(&'a CalibSample),

    /// Between two samples, `lower.current < query <= upper.current`.
    Interior {
        lower: &'a CalibSample,
        upper: &'a CalibSample
    }
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ResolutionMode {
    fn default() -> Self {
        ResolutionMode::Nearest
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionMode::Nearest => write!(f, "nearest"),
            ResolutionMode::Interpolated => write!(f, "interpolated")
        }
    }
}

impl FromStr for ResolutionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nearest" => Ok(ResolutionMode::Nearest),
            "interpolated" => Ok(ResolutionMode::Interpolated),
            _ => Err(ParseModeError(s.to_string()))
        }
    }
}

impl CalibTable {
    /// Resolve the position for `current` using the given mode.
    pub fn resolve(&self, current: f64, mode: ResolutionMode) -> f64 {
        match mode {
            ResolutionMode::Nearest => self.nearest_position(current),
            ResolutionMode::Interpolated => self.interpolated_position(current)
        }
    }

    /// Position of the sample closest in current to `current`.
    ///
    /// Queries outside the table are clamped to the end samples. When the
    /// query is equidistant from two samples the upper one is used.
    pub fn nearest_position(&self, current: f64) -> f64 {
        match self.bracket(current) {
            Some(Bracket::Low(s)) | Some(Bracket::High(s)) => s.position,
            Some(Bracket::Interior { lower, upper }) => {
                if (current - lower.current).abs() < (current - upper.current).abs() {
                    lower.position
                }
                else {
                    upper.position
                }
            },
            None => 0.0
        }
    }

    /// Position linearly interpolated between the samples either side of
    /// `current`.
    ///
    /// Queries outside the table are clamped to the end samples.
    pub fn interpolated_position(&self, current: f64) -> f64 {
        match self.bracket(current) {
            Some(Bracket::Low(s)) | Some(Bracket::High(s)) => s.position,
            Some(Bracket::Interior { lower, upper }) => {
                // Zero width bracket, only reachable with duplicate currents
                if upper.current == lower.current {
                    return upper.position
                }

                lin_map(
                    (lower.current, upper.current),
                    (lower.position, upper.position),
                    current
                )
            },
            None => 0.0
        }
    }

    /// Find the samples bracketing `current`.
    ///
    /// Returns `None` only for an empty table.
    fn bracket(&self, current: f64) -> Option<Bracket<'_>> {
        let samples = self.samples();

        if samples.is_empty() {
            return None
        }

        // Lower bound: index of the first sample with current >= query
        let idx = samples.partition_point(|s| s.current < current);

        Some(if idx == 0 {
            Bracket::Low(&samples[0])
        }
        else if idx == samples.len() {
            Bracket::High(&samples[idx - 1])
        }
        else {
            Bracket::Interior {
                lower: &samples[idx - 1],
                upper: &samples[idx]
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(points: &[(f64, f64)]) -> CalibTable {
        CalibTable::from_samples(
            points.iter()
                .map(|&(current, position)| CalibSample { current, position })
                .collect()
        ).unwrap()
    }

    fn linear() -> CalibTable {
        table(&[(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)])
    }

    #[test]
    fn test_nearest_exact_samples() {
        let t = table(&[(0.1, 3.0), (0.4, -2.0), (0.9, 7.5), (1.7, 8.25)]);

        for s in t.samples() {
            assert_eq!(t.nearest_position(s.current), s.position);
        }
    }

    #[test]
    fn test_nearest_interior() {
        let t = linear();

        assert_eq!(t.nearest_position(0.4), 0.0);
        assert_eq!(t.nearest_position(0.6), 10.0);
        assert_eq!(t.nearest_position(1.49), 10.0);
        assert_eq!(t.nearest_position(1.51), 20.0);

        // Ties go to the upper sample
        assert_eq!(t.nearest_position(0.5), 10.0);
        assert_eq!(t.nearest_position(1.5), 20.0);
    }

    #[test]
    fn test_interpolated_interior() {
        let t = linear();

        assert_eq!(t.interpolated_position(0.5), 5.0);
        assert_eq!(t.interpolated_position(1.0), 10.0);
        assert!((t.interpolated_position(1.25) - 12.5).abs() < 1e-12);

        let t = table(&[(0.2, 4.0), (0.6, -4.0)]);
        assert!((t.interpolated_position(0.4) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamping() {
        let t = linear();

        for mode in &[ResolutionMode::Nearest, ResolutionMode::Interpolated] {
            assert_eq!(t.resolve(-5.0, *mode), 0.0);
            assert_eq!(t.resolve(0.0, *mode), 0.0);
            assert_eq!(t.resolve(2.0, *mode), 20.0);
            assert_eq!(t.resolve(2.5, *mode), 20.0);
            assert_eq!(t.resolve(1e9, *mode), 20.0);
        }
    }

    #[test]
    fn test_single_sample() {
        let t = table(&[(1.0, 4.0)]);

        for mode in &[ResolutionMode::Nearest, ResolutionMode::Interpolated] {
            assert_eq!(t.resolve(0.0, *mode), 4.0);
            assert_eq!(t.resolve(1.0, *mode), 4.0);
            assert_eq!(t.resolve(3.0, *mode), 4.0);
        }
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("nearest".parse::<ResolutionMode>().unwrap(), ResolutionMode::Nearest);
        assert_eq!(
            " Interpolated ".parse::<ResolutionMode>().unwrap(),
            ResolutionMode::Interpolated
        );
        assert!("cubic".parse::<ResolutionMode>().is_err());
        assert_eq!(ResolutionMode::Interpolated.to_string(), "interpolated");
    }
}
