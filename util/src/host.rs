//! Host platform utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::env;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Environment variable pointing at the root of the software checkout.
pub const SW_ROOT_ENV_VAR: &str = "ACT_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory from the `ACT_SW_ROOT` environment
/// variable.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Resolve a path against the software root.
///
/// Absolute paths are returned unchanged.
pub fn resolve_path(path: &str) -> Result<PathBuf, env::VarError> {
    let path = PathBuf::from(path);

    if path.is_absolute() {
        return Ok(path)
    }

    let mut root = get_sw_root()?;
    root.push(path);
    Ok(root)
}
