//! Version scanner.
//!
//! Walks the history of the version-descriptor file and collects the
//! commits that introduced a major version inside the requested range.
//! The git invocation uses `-U0` patch context and a `commit:%H` pretty
//! format, so the text is a sequence of blocks: one `commit:<hash>` header
//! line followed by the diff lines of that commit. An added line
//! `+MAJOR=N` means commit `<hash>` set the major version to N.

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::collections::VecDeque;

use crate::config::Config;
use crate::process::run_captured;

/// One commit that introduced an in-range major version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRef {
    pub commit: String,
    pub major: u32,
}

/// Scan raw log text for major-version additions within `[min, max]`.
///
/// Each emitted [`CommitRef`] carries the hash of the nearest preceding
/// `commit:` header. Several `+MAJOR=` additions under one header emit
/// several refs with the same hash; nothing is deduplicated. Additions
/// seen before any header are ignored. Order follows the log text.
pub fn scan_log(text: &str, min: u32, max: u32) -> VecDeque<CommitRef> {
    let header_re = Regex::new(r"^commit:(\w+)").expect("commit header pattern is valid");
    let major_re = Regex::new(r"^\+MAJOR=(\d+)").expect("major addition pattern is valid");

    let mut commits = VecDeque::new();
    let mut current: Option<&str> = None;

    for line in text.lines() {
        if let Some(header) = header_re.captures(line).and_then(|c| c.get(1)) {
            current = Some(header.as_str());
        } else if let Some(caps) = major_re.captures(line) {
            let Some(hash) = current else { continue };
            let Ok(major) = caps[1].parse::<u32>() else {
                continue;
            };
            if min <= major && major <= max {
                commits.push_back(CommitRef {
                    commit: hash.to_string(),
                    major,
                });
            }
        }
    }

    commits
}

/// Retrieve the version-file history and scan it.
///
/// Stdout is captured for scanning; git's stderr passes through. A nonzero
/// git exit is fatal to the whole run.
pub fn list_version_commits(cfg: &Config) -> Result<VecDeque<CommitRef>> {
    let log = run_captured(
        "git log",
        &cfg.src_path(),
        "git",
        &[
            "--no-pager",
            "log",
            "--color=never",
            "--pretty=format:commit:%H",
            "-U0",
            &cfg.log_ref,
            "--",
            &cfg.log_path,
        ],
    )?;
    Ok(scan_log(&log, cfg.ver_min, cfg.ver_max))
}
