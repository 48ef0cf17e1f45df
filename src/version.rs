//! Commit metadata for the current checkout.
//!
//! After every checkout the version descriptor (`chrome/VERSION`) changes,
//! so a fresh [`HeadInfo`] is computed per commit: the four version fields
//! from the descriptor file, plus hash, author date and the optional
//! `Cr-Commit-Position` trailer from `git log -1`.
//!
//! Parsing is pure (string in, value out); only [`read_head_info`] touches
//! the filesystem and spawns git, so the parse paths are testable without a
//! checkout.

use anyhow::{bail, Context, Result};
use regex::Regex;
use std::fs;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::config::Config;
use crate::process::run_captured;

/// The four string-encoded fields of the version-descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeVersion {
    pub major: String,
    pub minor: String,
    pub build: String,
    pub patch: String,
}

/// Metadata of the checkout's most recent commit.
#[derive(Debug, Clone)]
pub struct HeadInfo {
    pub version: ChromeVersion,
    pub hash: String,
    pub author_date: OffsetDateTime,
    /// Raw `Cr-Commit-Position` trailer value, e.g.
    /// `refs/heads/master@{#12345}`.
    pub commit_position: Option<String>,
    /// Sequence number embedded in the trailer.
    pub commit_position_number: Option<u64>,
}

impl HeadInfo {
    /// Canonical revision string used for artifact and directory names:
    /// `MAJOR.MINOR.BUILD.PATCH`, suffixed with `@{#N}` when the commit
    /// carries a position trailer.
    pub fn revision(&self) -> String {
        let v = &self.version;
        let mut rev = format!("{}.{}.{}.{}", v.major, v.minor, v.build, v.patch);
        if let Some(no) = self.commit_position_number {
            rev.push_str(&format!("@{{#{}}}", no));
        }
        rev
    }
}

/// Parse the version-descriptor file: four `KEY=VALUE` lines for MAJOR,
/// MINOR, BUILD and PATCH. Carriage returns, spaces and tabs are stripped
/// before splitting, matching how the file is normalized upstream.
pub fn parse_version_file(text: &str) -> Result<ChromeVersion> {
    let normalized = text.replace('\r', "").replace([' ', '\t'], "");
    let mut fields = [None, None, None, None];
    let keys = ["MAJOR=", "MINOR=", "BUILD=", "PATCH="];

    for line in normalized.lines() {
        for (i, key) in keys.iter().enumerate() {
            if let Some(value) = line.strip_prefix(key) {
                fields[i] = Some(value.to_string());
            }
        }
    }

    match fields {
        [Some(major), Some(minor), Some(build), Some(patch)] => Ok(ChromeVersion {
            major,
            minor,
            build,
            patch,
        }),
        _ => bail!("version file is missing one of MAJOR/MINOR/BUILD/PATCH"),
    }
}

/// Parse the output of `git log -1 --pretty=format:%H%n%aI%n%b`: hash on
/// the first line, strict-ISO author date on the second, message body after
/// that. The body is searched for the first `Cr-Commit-Position` trailer.
pub fn parse_head_log(text: &str) -> Result<(String, OffsetDateTime, Option<(String, u64)>)> {
    let mut lines = text.lines();
    let hash = lines
        .next()
        .filter(|l| !l.is_empty())
        .context("git log output is missing the commit hash line")?
        .to_string();
    let date_line = lines
        .next()
        .context("git log output is missing the author date line")?;
    let author_date = OffsetDateTime::parse(date_line, &Rfc3339)
        .with_context(|| format!("parsing author date '{}'", date_line))?;

    let trailer_re = Regex::new(r"Cr-Commit-Position:\s+(.+@\{#(\d+)\})")
        .expect("commit position pattern is valid");
    let position = lines.find_map(|line| {
        let caps = trailer_re.captures(line)?;
        let raw = caps[1].to_string();
        let number: u64 = caps[2].parse().ok()?;
        Some((raw, number))
    });

    Ok((hash, author_date, position))
}

/// Read the version descriptor and head commit metadata for the current
/// checkout.
pub fn read_head_info(cfg: &Config) -> Result<HeadInfo> {
    let version_path = cfg.src_path().join(&cfg.version_file);
    let version_text = fs::read_to_string(&version_path)
        .with_context(|| format!("reading version file '{}'", version_path.display()))?;
    let version = parse_version_file(&version_text)
        .with_context(|| format!("parsing version file '{}'", version_path.display()))?;

    let log = run_captured(
        "git log",
        &cfg.src_path(),
        "git",
        &["log", "-1", "--pretty=format:%H%n%aI%n%b"],
    )?;
    let (hash, author_date, position) = parse_head_log(&log)?;
    let (commit_position, commit_position_number) = match position {
        Some((raw, number)) => (Some(raw), Some(number)),
        None => (None, None),
    };

    Ok(HeadInfo {
        version,
        hash,
        author_date,
        commit_position,
        commit_position_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn version_35() -> ChromeVersion {
        ChromeVersion {
            major: "35".to_string(),
            minor: "0".to_string(),
            build: "1".to_string(),
            patch: "2".to_string(),
        }
    }

    #[test]
    fn parses_plain_version_file() {
        let v = parse_version_file("MAJOR=35\nMINOR=0\nBUILD=1\nPATCH=2\n").unwrap();
        assert_eq!(v, version_35());
    }

    #[test]
    fn normalizes_crlf_and_whitespace() {
        let v = parse_version_file("MAJOR = 35\r\nMINOR =\t0\r\nBUILD = 1\r\nPATCH = 2\r\n")
            .unwrap();
        assert_eq!(v, version_35());
    }

    #[test]
    fn rejects_truncated_version_file() {
        assert!(parse_version_file("MAJOR=35\nMINOR=0\n").is_err());
    }

    #[test]
    fn parses_head_log_with_commit_position() {
        let log = "0123abcd\n2014-05-07T12:34:56+02:00\n\
                   Roll deps.\n\nCr-Commit-Position: refs/heads/master@{#12345}\n";
        let (hash, date, position) = parse_head_log(log).unwrap();
        assert_eq!(hash, "0123abcd");
        assert_eq!(date, datetime!(2014-05-07 12:34:56 +02:00));
        let (raw, number) = position.unwrap();
        assert_eq!(raw, "refs/heads/master@{#12345}");
        assert_eq!(number, 12345);
    }

    #[test]
    fn head_log_without_trailer_has_no_position() {
        let log = "0123abcd\n2014-05-07T12:34:56Z\nJust a change.\n";
        let (_, _, position) = parse_head_log(log).unwrap();
        assert!(position.is_none());
    }

    #[test]
    fn head_log_missing_date_is_an_error() {
        assert!(parse_head_log("0123abcd").is_err());
    }

    #[test]
    fn revision_includes_commit_position_when_present() {
        let info = HeadInfo {
            version: version_35(),
            hash: "0123abcd".to_string(),
            author_date: datetime!(2014-05-07 12:34:56 UTC),
            commit_position: Some("refs/heads/master@{#12345}".to_string()),
            commit_position_number: Some(12345),
        };
        assert_eq!(info.revision(), "35.0.1.2@{#12345}");
    }

    #[test]
    fn revision_without_commit_position_has_no_suffix() {
        let info = HeadInfo {
            version: version_35(),
            hash: "0123abcd".to_string(),
            author_date: datetime!(2014-05-07 12:34:56 UTC),
            commit_position: None,
            commit_position_number: None,
        };
        assert_eq!(info.revision(), "35.0.1.2");
    }
}
