//! External tool detection.
//!
//! The runtime build shells out to a Python interpreter. Checking for it up
//! front lets a controller warn before a job is started instead of failing
//! at `RuntimeBuilt` with a half-built directory to roll back.

use std::{path::PathBuf, process::Command};

/// A Python interpreter found on `PATH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpreter {
    pub path: PathBuf,
    pub version: String,
}

/// Resolves `program` on `PATH` and checks that it runs.
///
/// Returns `None` when it is missing or `--version` fails.
pub fn detect_interpreter(program: &str) -> Option<Interpreter> {
    let path = match which::which(program) {
        Ok(path) => path,
        Err(e) => {
            log::debug!("{} not found in PATH: {}", program, e);
            return None;
        }
    };
    log::debug!("Found {} at: {}", program, path.display());

    match Command::new(&path).arg("--version").output() {
        Ok(output) if output.status.success() => {
            // python2 wrote its version to stderr
            let raw = if output.stdout.is_empty() {
                output.stderr
            } else {
                output.stdout
            };
            let version = String::from_utf8_lossy(&raw).trim().to_string();
            log::debug!("{} available: {}", program, version);
            Some(Interpreter { path, version })
        }
        Ok(output) => {
            log::warn!(
                "{} found at {} but --version failed (exit code: {:?}). Stderr: {}",
                program,
                path.display(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            );
            None
        }
        Err(e) => {
            log::warn!(
                "{} found at {} but failed to execute: {}. Check file permissions.",
                program,
                path.display(),
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_program_is_not_detected() {
        assert_eq!(detect_interpreter("appnera-no-such-python-3000"), None);
    }

    #[cfg(unix)]
    #[test]
    fn failing_version_check_is_not_detected() {
        // `false` exists everywhere and exits non-zero
        assert_eq!(detect_interpreter("false"), None);
    }
}
