//! Checkout/build loop.
//!
//! Drives the whole run: scan the version history, then for each in-range
//! commit reset and clean the working tree, check the commit out, bring
//! dependencies to its manifest, and hand over to the per-architecture
//! build pass. Strictly sequential; the first failing step aborts the run.
//!
//! Step order per commit (matching the recorded behavior of the tool this
//! replaces):
//!
//! ```text
//! git reset → git clean → git checkout → gclient recurse git reset
//!   → gclient recurse git clean → gclient sync --nohooks → build pass
//! ```
//!
//! The initial reset/clean cleanup runs even when the scanner finds
//! nothing, leaving the tree in a known state.

use anyhow::Result;
use std::collections::VecDeque;

use crate::build_pass;
use crate::config::Config;
use crate::scanner::{self, CommitRef};
use crate::version::read_head_info;
use crate::{gclient, git, preflight};

/// Run the full pipeline: preflight, scan, then build every queued commit.
pub fn run(cfg: &Config) -> Result<()> {
    preflight::check(cfg)?;

    let mut commits = scanner::list_version_commits(cfg)?;
    println!(
        "[multibuild] {} commit(s) in range {}..={}:",
        commits.len(),
        cfg.ver_min,
        cfg.ver_max
    );
    println!("{}", serde_json::to_string_pretty(&commits)?);

    build_commits(cfg, &mut commits)?;

    println!("[multibuild] all done");
    Ok(())
}

/// Consume the commit queue front to back, building each checkout for
/// every configured architecture.
fn build_commits(cfg: &Config, commits: &mut VecDeque<CommitRef>) -> Result<()> {
    let src = cfg.src_path();

    // Clean up whatever state the tree was left in, queued work or not.
    git::reset_hard(&src)?;
    git::clean(&src)?;

    while let Some(commit) = commits.pop_front() {
        println!(
            "[multibuild] building {} (major {})",
            commit.commit, commit.major
        );
        git::checkout(&src, &commit.commit)?;
        gclient::recurse_reset(&src)?;
        gclient::recurse_clean(&src)?;
        gclient::sync_nohooks(&src)?;

        // The version file changed with the checkout; re-read it.
        let head = read_head_info(cfg)?;
        println!(
            "[multibuild] head is {} ({})",
            head.revision(),
            head.hash
        );

        let mut archs: VecDeque<String> = cfg.archs.iter().cloned().collect();
        build_pass::run(cfg, &head, &mut archs)?;

        if !commits.is_empty() {
            git::reset_hard(&src)?;
            git::clean(&src)?;
        }
    }

    Ok(())
}
