//! Preflight checks run before the pipeline starts.
//!
//! A multi-commit archive run can take many hours; missing host tools or a
//! wrong working directory should fail up front, not three steps into the
//! first checkout.

use anyhow::{bail, Result};

use crate::config::Config;

/// Host tools the pipeline drives, as (command, providing package).
pub const REQUIRED_TOOLS: &[(&str, &str)] = &[
    ("git", "git"),
    ("gclient", "depot_tools"),
    ("ninja", "ninja-build"),
];

/// Check if a command resolves on PATH.
pub fn command_exists(cmd: &str) -> bool {
    which::which(cmd).is_ok()
}

/// Check that every required tool is available, reporting all missing ones
/// at once.
pub fn check_required_tools(tools: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<_> = tools
        .iter()
        .filter(|(tool, _)| !command_exists(tool))
        .collect();

    if !missing.is_empty() {
        let msg = missing
            .iter()
            .map(|(t, p)| format!("  {} (install: {})", t, p))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("missing required host tools:\n{}", msg);
    }

    Ok(())
}

/// Check that `root` looks like a gclient-managed checkout: a `.gclient`
/// file beside the working tree directory.
pub fn check_checkout_layout(cfg: &Config) -> Result<()> {
    let gclient_file = cfg.root.join(".gclient");
    if !gclient_file.is_file() {
        bail!(
            "'{}' is not a gclient checkout root (no .gclient file); \
             run from the directory that holds .gclient and '{}'",
            cfg.root.display(),
            cfg.src_dir
        );
    }
    if !cfg.src_path().is_dir() {
        bail!(
            "working tree '{}' does not exist; bootstrap the checkout first",
            cfg.src_path().display()
        );
    }
    Ok(())
}

/// All preflight checks for a run.
pub fn check(cfg: &Config) -> Result<()> {
    check_required_tools(REQUIRED_TOOLS)?;
    check_checkout_layout(cfg)?;
    Ok(())
}
