//! Working-tree git operations.
//!
//! Thin wrappers over the git subcommands the pipeline drives. All of them
//! run inside the `src` working tree with passthrough stdio; log retrieval
//! lives with its consumers (`scanner`, `version`) because its output is
//! parsed rather than shown.

use anyhow::Result;
use std::path::Path;

use crate::process::run_passthrough;

/// `git reset -q --hard HEAD`: drop local modifications.
pub fn reset_hard(src: &Path) -> Result<()> {
    run_passthrough("git reset", src, "git", &["reset", "-q", "--hard", "HEAD"])
}

/// `git clean -fdq`: remove untracked files and directories.
pub fn clean(src: &Path) -> Result<()> {
    run_passthrough("git clean", src, "git", &["clean", "-fdq"])
}

/// `git checkout <commit>`: move the working tree to a historical commit.
pub fn checkout(src: &Path, commit: &str) -> Result<()> {
    run_passthrough("git checkout", src, "git", &["checkout", commit])
}
