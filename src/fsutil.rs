//! Local filesystem helpers for the build pass.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use time::OffsetDateTime;

// Timestamp stamping goes through utimes(2); the tools this crate drives
// are unix-only anyway.
#[cfg(not(unix))]
compile_error!("chromium-multibuild only supports unix targets");

/// Remove a directory tree if it exists; absent is fine.
pub fn remove_dir_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("removing '{}'", path.display()))?;
        println!("[multibuild] removed '{}'", path.display());
    } else {
        println!("[multibuild] '{}' does not exist, nothing to remove", path.display());
    }
    Ok(())
}

/// Set a path's access and modification times to `when`.
///
/// Archived artifacts carry their commit's author date, so a directory
/// listing of the release tree reads as a build timeline.
pub fn set_file_times(path: &Path, when: OffsetDateTime) -> Result<()> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .with_context(|| format!("path '{}' contains a NUL byte", path.display()))?;
    let tv = libc::timeval {
        tv_sec: when.unix_timestamp() as libc::time_t,
        tv_usec: 0,
    };
    let times = [tv, tv];

    let rc = unsafe { libc::utimes(c_path.as_ptr(), times.as_ptr()) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error())
            .with_context(|| format!("setting timestamps on '{}'", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;
    use time::macros::datetime;

    #[test]
    fn removes_existing_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("out");
        fs::create_dir_all(dir.join("Release")).unwrap();
        remove_dir_if_exists(&dir).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn missing_directory_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        remove_dir_if_exists(&temp.path().join("out")).unwrap();
    }

    #[test]
    fn stamps_file_with_commit_time() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("artifact.apk");
        fs::write(&file, b"apk").unwrap();

        let when = datetime!(2014-05-07 12:34:56 UTC);
        set_file_times(&file, when).unwrap();

        let mtime = fs::metadata(&file).unwrap().modified().unwrap();
        let expected = UNIX_EPOCH + Duration::from_secs(when.unix_timestamp() as u64);
        assert_eq!(mtime, expected);
    }

    #[test]
    fn stamps_directories_too() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("35.0.1.2");
        fs::create_dir(&dir).unwrap();

        let when = datetime!(2014-05-07 12:34:56 UTC);
        set_file_times(&dir, when).unwrap();

        let mtime = fs::metadata(&dir).unwrap().modified().unwrap();
        let expected = UNIX_EPOCH + Duration::from_secs(when.unix_timestamp() as u64);
        assert_eq!(mtime, expected);
    }
}
