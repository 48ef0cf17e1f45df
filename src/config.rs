//! Build configuration.
//!
//! Every knob defaults to the value a stock Chromium-for-Android archive
//! run uses; an optional `multibuild.toml` next to the `.gclient` file (or
//! passed on the command line) overrides individual fields.
//!
//! ```toml
//! ver_min = 29
//! ver_max = 35
//! archs = ["ia32", "arm"]
//! release_dir = "builds"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Architectures the build tool knows how to target.
pub const KNOWN_ARCHS: &[&str] = &["arm", "arm64", "ia32", "x64"];

/// Resolved configuration for one archive run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Checkout root: the directory holding `.gclient` and `src/`.
    pub root: PathBuf,
    /// Minimum major version to build (inclusive).
    pub ver_min: u32,
    /// Maximum major version to build (inclusive).
    pub ver_max: u32,
    /// Target architectures, built strictly in this order.
    pub archs: Vec<String>,
    /// Target operating system written into the gyp environment file.
    pub target_os: String,
    /// Ninja target name.
    pub ninja_target: String,
    /// Artifact path relative to the build output directory.
    pub artifact: String,
    /// Release archive root, relative to `root`.
    pub release_dir: String,
    /// Working tree directory, relative to `root`.
    pub src_dir: String,
    /// Version-descriptor file, relative to `src_dir`.
    pub version_file: String,
    /// Ref whose history the version scanner walks.
    pub log_ref: String,
    /// Path whose history the version scanner walks, relative to `src_dir`.
    pub log_path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    ver_min: Option<u32>,
    ver_max: Option<u32>,
    archs: Option<Vec<String>>,
    target_os: Option<String>,
    ninja_target: Option<String>,
    artifact: Option<String>,
    release_dir: Option<String>,
    src_dir: Option<String>,
    version_file: Option<String>,
    log_ref: Option<String>,
    log_path: Option<String>,
}

impl Config {
    /// Defaults rooted at `root`, matching a stock Chromium Android run.
    pub fn defaults(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            ver_min: 29,
            ver_max: 35,
            archs: vec!["ia32".to_string(), "arm".to_string()],
            target_os: "android".to_string(),
            ninja_target: "content_shell_apk".to_string(),
            artifact: "apks/ContentShell.apk".to_string(),
            release_dir: "builds".to_string(),
            src_dir: "src".to_string(),
            version_file: "chrome/VERSION".to_string(),
            log_ref: "origin/lkgr".to_string(),
            log_path: "chrome/VERSION".to_string(),
        }
    }

    /// Load configuration for a run rooted at `root`.
    ///
    /// `config_path` is an explicit TOML file; when `None`, a
    /// `multibuild.toml` under `root` is read if it exists, otherwise the
    /// defaults are used unchanged.
    pub fn load(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let implicit = root.join("multibuild.toml");
        let path = match config_path {
            Some(path) => Some(path.to_path_buf()),
            None if implicit.is_file() => Some(implicit),
            None => None,
        };

        let overrides = match path {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading config '{}'", path.display()))?;
                toml::from_str(&text)
                    .with_context(|| format!("parsing config '{}'", path.display()))?
            }
            None => ConfigToml::default(),
        };

        let mut cfg = Self::defaults(root);
        if let Some(v) = overrides.ver_min {
            cfg.ver_min = v;
        }
        if let Some(v) = overrides.ver_max {
            cfg.ver_max = v;
        }
        if let Some(v) = overrides.archs {
            cfg.archs = v;
        }
        if let Some(v) = overrides.target_os {
            cfg.target_os = v;
        }
        if let Some(v) = overrides.ninja_target {
            cfg.ninja_target = v;
        }
        if let Some(v) = overrides.artifact {
            cfg.artifact = v;
        }
        if let Some(v) = overrides.release_dir {
            cfg.release_dir = v;
        }
        if let Some(v) = overrides.src_dir {
            cfg.src_dir = v;
        }
        if let Some(v) = overrides.version_file {
            cfg.version_file = v;
        }
        if let Some(v) = overrides.log_ref {
            cfg.log_ref = v;
        }
        if let Some(v) = overrides.log_path {
            cfg.log_path = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.ver_min > self.ver_max {
            bail!(
                "invalid version range: ver_min {} > ver_max {}",
                self.ver_min,
                self.ver_max
            );
        }
        if self.archs.is_empty() {
            bail!("archs must name at least one architecture");
        }
        for arch in &self.archs {
            if !KNOWN_ARCHS.contains(&arch.as_str()) {
                bail!(
                    "unknown architecture '{}' (expected one of: {})",
                    arch,
                    KNOWN_ARCHS.join(", ")
                );
            }
        }
        Ok(())
    }

    /// Working tree directory (`<root>/src` by default).
    pub fn src_path(&self) -> PathBuf {
        self.root.join(&self.src_dir)
    }

    /// Release archive root (`<root>/builds` by default).
    pub fn release_path(&self) -> PathBuf {
        self.root.join(&self.release_dir)
    }

    /// Gyp environment file written before each per-arch build.
    pub fn gyp_env_path(&self) -> PathBuf {
        self.root.join("chromium.gyp_env")
    }

    /// Build output directory removed before each per-arch build.
    pub fn out_path(&self) -> PathBuf {
        self.src_path().join("out")
    }

    /// Where ninja leaves the artifact for the current architecture.
    pub fn artifact_path(&self) -> PathBuf {
        self.src_path().join("out/Release").join(&self.artifact)
    }
}
