//! Archive builder for historical Chromium versions.
//!
//! Given a bootstrapped gclient checkout, this crate scans the history of
//! the version-descriptor file for commits that introduced a major version
//! inside a configured range, then builds each of those commits for every
//! configured architecture and archives the artifacts under
//! version-stamped directories:
//!
//! ```text
//! builds/
//!   35.0.1.2@{#12345}/
//!     ContentShell_35.0.1.2@{#12345}_ia32.apk
//!     ContentShell_35.0.1.2@{#12345}_arm.apk
//! ```
//!
//! # Architecture
//!
//! ```text
//! scanner ──► pipeline ──► build_pass
//!    │            │             │
//!    │            │             ├── git / gclient / ninja (child processes)
//!    │            │             └── fsutil (copy + timestamp stamping)
//!    │            └── version (per-checkout commit metadata)
//!    └── git log -U0 of chrome/VERSION
//! ```
//!
//! Everything external (git, gclient, ninja) runs as a child process
//! awaited to completion; the pipeline is a single thread of control and
//! any step failure aborts the whole run (see [`error::StepError`] for the
//! exit-code mapping).

pub mod build_pass;
pub mod config;
pub mod error;
pub mod fsutil;
pub mod gclient;
pub mod git;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod scanner;
pub mod version;

#[cfg(test)]
mod testutil;

pub use config::Config;
pub use error::StepError;
pub use scanner::CommitRef;
pub use version::{ChromeVersion, HeadInfo};
