//! Logger setup for the actuator executables
//!
//! Records go to stdout and to the session log file as
//! `[<elapsed s> <LVL>] <component>: <message>`, where the component is the
//! module of the actuator software that emitted the record (`actuator`,
//! `calib`, ...). Records from third party crates are only kept at `WARN`
//! and above.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Crates logged at the requested level, everything else is capped at
/// `WARN`.
const ACT_CRATES: [&str; 3] = ["act_exec", "act_lib", "util"];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Actuator logs need at least `INFO` to record state changes, found `{0}`")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Cannot open the session log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been installed: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Install the global logger for this session.
///
/// `min_level` must be `Info` or more verbose, actuator state changes are
/// logged at `Info` and must always reach the log file.
///
/// Can only succeed once per process.
pub fn logger_init(
    min_level: LevelFilter,
    session: &Session
) -> Result<(), LoggerInitError> {

    check_min_level(min_level)?;

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let dispatch = ACT_CRATES.iter().fold(
        fern::Dispatch::new().level(LevelFilter::Warn),
        |d, &name| d.level_for(name, min_level)
    );

    dispatch
        .format(|out, message, record| out.finish(format_args!(
            "[{:10.6} {}] {}: {}",
            session::get_elapsed_seconds(),
            level_tag(record.level()),
            component(record.target()),
            message
        )))
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging at {} to {:?}", min_level, session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn check_min_level(min_level: LevelFilter) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }
    else {
        Ok(())
    }
}

/// Short name of the module which emitted a record.
///
/// `act_lib::actuator::observer` becomes `actuator`, a bare crate target is
/// kept as it is.
fn component(target: &str) -> &str {
    let mut parts = target.split("::");
    let krate = parts.next().unwrap_or(target);
    parts.next().unwrap_or(krate)
}

/// Three letter coloured tag for a level.
fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERR".red().bold(),
        Level::Warn  => "WRN".yellow(),
        Level::Info  => "INF".normal(),
        Level::Debug => "DBG".dimmed(),
        Level::Trace => "TRC".dimmed().italic()
    }
}
