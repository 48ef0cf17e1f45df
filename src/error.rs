//! Step failure classification and process exit codes.
//!
//! Every external step in the pipeline can fail in one of three ways, and
//! each way maps to a documented exit code of the `chromium-multibuild`
//! binary:
//!
//! - a child process exits nonzero → exit 1
//! - a child process is killed by a signal → exit 1
//! - the gyp environment file cannot be written → exit 2
//!
//! Step functions return `anyhow::Result`; the binary downcasts the chain
//! to [`StepError`] to pick the exit code, so the process terminates in
//! exactly one place.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A failed pipeline step.
#[derive(Debug, Error)]
pub enum StepError {
    /// A child process exited with a nonzero status.
    #[error("step '{step}' failed with exit code {code}")]
    External { step: String, code: i32 },

    /// A child process was terminated by a signal before exiting.
    #[error("step '{step}' was terminated by a signal")]
    Signaled { step: String },

    /// Writing the build-configuration file failed.
    #[error("cannot write build configuration '{path}'")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StepError {
    /// Exit code the whole process should terminate with.
    pub fn exit_code(&self) -> i32 {
        match self {
            StepError::External { .. } | StepError::Signaled { .. } => 1,
            StepError::ConfigWrite { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_and_signal_map_to_exit_1() {
        let external = StepError::External {
            step: "ninja".to_string(),
            code: 3,
        };
        let signaled = StepError::Signaled {
            step: "gclient sync".to_string(),
        };
        assert_eq!(external.exit_code(), 1);
        assert_eq!(signaled.exit_code(), 1);
    }

    #[test]
    fn config_write_maps_to_exit_2() {
        let err = StepError::ConfigWrite {
            path: PathBuf::from("/tmp/chromium.gyp_env"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn external_message_names_the_step() {
        let err = StepError::External {
            step: "git checkout".to_string(),
            code: 128,
        };
        assert_eq!(
            err.to_string(),
            "step 'git checkout' failed with exit code 128"
        );
    }
}
