//! Per-architecture build pass.
//!
//! For a fixed checkout, builds every configured architecture in order and
//! archives each artifact under `<release_dir>/<rev>/`. The `out/` build
//! directory is shared across architectures, so each pass starts by
//! deleting it; that is also why architectures never build in parallel.

use anyhow::{Context, Result};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::error::StepError;
use crate::fsutil::{remove_dir_if_exists, set_file_times};
use crate::gclient;
use crate::process::run_passthrough;
use crate::version::HeadInfo;

/// Build every architecture in `archs` for the current checkout and copy
/// the artifacts into the release directory. Consumes the queue front to
/// back; after the last architecture the release subdirectory itself is
/// stamped with the commit's author date.
pub fn run(cfg: &Config, head: &HeadInfo, archs: &mut VecDeque<String>) -> Result<()> {
    let rev = head.revision();
    let release_dir = cfg.release_path().join(&rev);

    while let Some(arch) = archs.pop_front() {
        configure(cfg, &arch)?;
        build(cfg, &arch)?;
        archive_artifact(cfg, head, &rev, &release_dir, &arch)?;
    }

    set_file_times(&release_dir, head.author_date)?;
    Ok(())
}

/// Prepare the checkout for one architecture: wipe prior output, select
/// the architecture in the gyp environment file, run hooks.
fn configure(cfg: &Config, arch: &str) -> Result<()> {
    println!("[multibuild] configuring for '{}'", arch);

    remove_dir_if_exists(&cfg.out_path())?;
    write_gyp_env(&cfg.gyp_env_path(), &cfg.target_os, arch)?;
    gclient::runhooks(&cfg.src_path())
}

/// Write the gyp environment file selecting `target_os` and `arch`.
///
/// A failure here is the one local-filesystem error with its own exit
/// code (2), distinct from external-step failures.
fn write_gyp_env(path: &Path, target_os: &str, arch: &str) -> Result<()> {
    let content = format!(
        "{{ 'GYP_DEFINES': 'OS={} target_arch={}', }}",
        target_os, arch
    );
    fs::write(path, content).map_err(|source| {
        StepError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn build(cfg: &Config, arch: &str) -> Result<()> {
    println!("[multibuild] building '{}'", arch);
    run_passthrough(
        "ninja",
        &cfg.src_path(),
        "ninja",
        &["-C", "out/Release", &cfg.ninja_target],
    )
}

/// Copy the built artifact into `<release_dir>/` under its archive name
/// and stamp it with the commit's author date.
fn archive_artifact(
    cfg: &Config,
    head: &HeadInfo,
    rev: &str,
    release_dir: &Path,
    arch: &str,
) -> Result<()> {
    fs::create_dir_all(release_dir)
        .with_context(|| format!("creating release directory '{}'", release_dir.display()))?;

    let source = cfg.artifact_path();
    let dest = release_dir.join(artifact_name(&cfg.artifact, rev, arch));
    println!(
        "[multibuild] copying '{}' to '{}'",
        source.display(),
        dest.display()
    );
    fs::copy(&source, &dest).with_context(|| {
        format!(
            "copying artifact '{}' to '{}'",
            source.display(),
            dest.display()
        )
    })?;
    set_file_times(&dest, head.author_date)?;
    Ok(())
}

/// Archive filename: `<stem>_<rev>_<arch>.<ext>`, where `<rev>` already
/// carries the `@{#N}` commit-position suffix when the commit has one.
fn artifact_name(artifact: &str, rev: &str, arch: &str) -> String {
    let base = Path::new(artifact);
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact");
    match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}_{}.{}", stem, rev, arch, ext),
        None => format!("{}_{}_{}", stem, rev, arch),
    }
}
