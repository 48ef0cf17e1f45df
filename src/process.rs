//! Child-process execution helpers.
//!
//! The whole pipeline is a chain of external commands, each awaited to
//! completion before the next starts. Two modes cover everything:
//!
//! - [`run_passthrough`]: stdio inherited so the user watches the tool run;
//!   used for reset/clean/checkout/sync/build steps.
//! - [`run_captured`]: stdout captured for parsing, stderr inherited for
//!   visibility; used for the two `git log` retrievals.
//!
//! A nonzero exit or a signal termination is classified into [`StepError`]
//! and is always fatal to the pipeline; there are no retries and no
//! timeouts.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::StepError;

/// Run a step with inherited stdio, printing start/end status lines.
///
/// `step` is the human-readable step name used in status lines and error
/// messages, e.g. `"git reset"`.
pub fn run_passthrough(step: &str, cwd: &Path, program: &str, args: &[&str]) -> Result<()> {
    println!("[multibuild] starting '{}' in '{}'", step, cwd.display());
    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .with_context(|| format!("spawning '{}' for step '{}'", program, step))?;

    check_status(step, status.code())?;
    println!("[multibuild] '{}' done", step);
    Ok(())
}

/// Run a step capturing stdout as UTF-8; stderr passes through.
pub fn run_captured(step: &str, cwd: &Path, program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| format!("spawning '{}' for step '{}'", program, step))?;

    check_status(step, output.status.code())?;
    String::from_utf8(output.stdout)
        .with_context(|| format!("step '{}' emitted non-UTF-8 output", step))
}

/// Classify an exit status. `None` means the child was signal-terminated,
/// which is treated as fatal rather than silently ignored.
fn check_status(step: &str, code: Option<i32>) -> Result<()> {
    match code {
        Some(0) => Ok(()),
        Some(code) => Err(StepError::External {
            step: step.to_string(),
            code,
        }
        .into()),
        None => Err(StepError::Signaled {
            step: step.to_string(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn cwd() -> PathBuf {
        std::env::temp_dir()
    }

    #[test]
    fn passthrough_succeeds_on_exit_0() {
        run_passthrough("noop", &cwd(), "sh", &["-c", "exit 0"]).unwrap();
    }

    #[test]
    fn passthrough_reports_nonzero_exit_code() {
        let err = run_passthrough("failing step", &cwd(), "sh", &["-c", "exit 3"]).unwrap_err();
        match err.downcast_ref::<StepError>() {
            Some(StepError::External { step, code }) => {
                assert_eq!(step, "failing step");
                assert_eq!(*code, 3);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn captured_returns_stdout() {
        let out = run_captured("echo", &cwd(), "sh", &["-c", "printf hello"]).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn captured_fails_on_nonzero_exit() {
        let err = run_captured("git log", &cwd(), "sh", &["-c", "exit 1"]).unwrap_err();
        assert!(err.downcast_ref::<StepError>().is_some());
    }

    #[test]
    fn signal_termination_is_classified() {
        // The shell re-raises SIGKILL against itself, so the child's exit
        // status carries no code.
        let err = run_passthrough("doomed", &cwd(), "sh", &["-c", "kill -9 $$"]).unwrap_err();
        match err.downcast_ref::<StepError>() {
            Some(StepError::Signaled { step }) => assert_eq!(step, "doomed"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
