//! Dependency-sync operations via gclient.
//!
//! A Chromium checkout pins dozens of dependency repositories; after moving
//! the main tree to a historical commit they must be reset, cleaned and
//! re-synced to that commit's manifest before anything can build. Hooks are
//! skipped during sync; they run per architecture in the build pass, after
//! the gyp environment file is in place.

use anyhow::Result;
use std::path::Path;

use crate::process::run_passthrough;

/// `gclient recurse git reset -q --hard HEAD` across all dependency repos.
pub fn recurse_reset(src: &Path) -> Result<()> {
    run_passthrough(
        "gclient recurse git reset",
        src,
        "gclient",
        &["recurse", "git", "reset", "-q", "--hard", "HEAD"],
    )
}

/// `gclient recurse git clean -dfq` across all dependency repos.
pub fn recurse_clean(src: &Path) -> Result<()> {
    run_passthrough(
        "gclient recurse git clean",
        src,
        "gclient",
        &["recurse", "git", "clean", "-dfq"],
    )
}

/// `gclient sync --nohooks`: bring dependencies to the checked-out
/// manifest without running hooks.
pub fn sync_nohooks(src: &Path) -> Result<()> {
    run_passthrough("gclient sync", src, "gclient", &["sync", "--nohooks"])
}

/// `gclient runhooks`: run post-sync hooks, picking up the gyp environment
/// file written for the current architecture.
pub fn runhooks(src: &Path) -> Result<()> {
    run_passthrough("gclient runhooks", src, "gclient", &["runhooks"])
}
