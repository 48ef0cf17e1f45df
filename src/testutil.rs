//! Test support: stand-in external tools on PATH.
//!
//! Pipeline tests replace git/gclient/ninja with small shell scripts that
//! record their invocations. PATH is process-global, so [`StubPath`] holds
//! a lock for its lifetime and restores the original PATH on drop; tests
//! using stubs therefore serialize against each other but not against the
//! rest of the suite.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

static PATH_LOCK: Mutex<()> = Mutex::new(());

/// A directory of stub executables prepended to PATH.
pub(crate) struct StubPath {
    _guard: MutexGuard<'static, ()>,
    saved: Option<String>,
    dir: PathBuf,
}

impl StubPath {
    pub(crate) fn new(dir: &Path) -> Self {
        let guard = PATH_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        fs::create_dir_all(dir).unwrap();
        let saved = std::env::var("PATH").ok();
        let prepended = match &saved {
            Some(old) => format!("{}:{}", dir.display(), old),
            None => dir.display().to_string(),
        };
        std::env::set_var("PATH", prepended);
        Self {
            _guard: guard,
            saved,
            dir: dir.to_path_buf(),
        }
    }

    /// Install an executable shell script named `name` in the stub dir.
    pub(crate) fn stub(&self, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;
        let path = self.dir.join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// A stub that appends `<tool> <args>` to `calls` and exits 0; `extra`
    /// shell lines run after the logging line.
    pub(crate) fn logging_script(tool: &str, calls: &Path, extra: &str) -> String {
        format!(
            "#!/bin/sh\nprintf '{} %s\\n' \"$*\" >> '{}'\n{}exit 0\n",
            tool,
            calls.display(),
            extra
        )
    }
}

impl Drop for StubPath {
    fn drop(&mut self) {
        match &self.saved {
            Some(old) => std::env::set_var("PATH", old),
            None => std::env::remove_var("PATH"),
        }
    }
}
