//! # Actuator Executable
//!
//! Drives a single current controlled actuator through a scripted sequence:
//!
//!     - Load calibration and report the initial state
//!     - Initialise
//!     - Sweep the commanded current through the configured values
//!     - Demonstrate the latched fault, recovery and a second fault
//!     - Shut down
//!
//! Every step is logged and the actuator status is archived to
//! `arch/actuator_status.csv` in the session directory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use log::{info, warn};
use color_eyre::{Result, eyre::WrapErr};
use structopt::StructOpt;

// Internal
use act_lib::{
    actuator::{Actuator, LogObserver},
    calib::{CalibSource, ResolutionMode},
    params::ActExecParams,
};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    params,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "act_exec", about = "Current controlled actuator demonstration")]
struct Opts {
    /// Parameter file, relative to `$ACT_SW_ROOT/params`.
    #[structopt(long, default_value = "act_exec.toml")]
    params: String,

    /// Override the resolution mode ("nearest" or "interpolated").
    #[structopt(long)]
    mode: Option<ResolutionMode>,

    /// Log debug records as well.
    #[structopt(short, long)]
    verbose: bool,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new(
        "act_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    let level = if opts.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    logger_init(level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Actuator Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let mut params: ActExecParams = params::load(&opts.params)
        .wrap_err("Failed to load parameters")?;

    if let Some(mode) = opts.mode {
        params.actuator.mode = mode;
    }

    info!("Parameters loaded");

    let mut arch = Archiver::from_path(&session, "actuator_status.csv")
        .wrap_err("Failed to create the status archive")?;

    // ---- CONSTRUCTION ----

    let mut actuator = Actuator::from_params(&params.actuator, LogObserver);

    info!(
        "Actuator created from {} in {} mode, state: {:?}",
        actuator.source().name(),
        actuator.mode(),
        actuator.state()
    );
    arch.serialise(actuator.status())?;

    // ---- INITIALISATION ----

    if actuator.initialize() {
        info!("Initialisation successful");
    }
    else {
        warn!("Initialisation failed, state: {:?}", actuator.state());
    }
    arch.serialise(actuator.status())?;

    // ---- CURRENT SWEEP ----

    info!("Sweeping {} currents", params.sweep_currents_a.len());

    for &current in params.sweep_currents_a.iter() {
        if actuator.set_current(current) {
            info!("Current: {} A, Position: {} mm", current, actuator.position());
        }
        arch.serialise(actuator.status())?;
    }

    info!("Sweep complete, state: {:?}", actuator.state());

    // ---- FAULT AND RECOVERY ----

    if actuator.initialize() {
        info!("Re-initialised, state: {:?}", actuator.state());
    }

    if !actuator.set_current(params.fault_current_a) {
        info!(
            "Setting {} A failed (expected), state: {:?}",
            params.fault_current_a,
            actuator.state()
        );
    }
    arch.serialise(actuator.status())?;

    if let Some(&current) = params.sweep_currents_a.first() {
        if !actuator.set_current(current) {
            info!("Setting {} A in the faulted state failed (expected)", current);
        }
        arch.serialise(actuator.status())?;
    }

    // ---- SHUTDOWN ----

    actuator.shutdown();
    info!("Shut down, state: {:?}", actuator.state());
    arch.serialise(actuator.status())?;

    Ok(())
}
