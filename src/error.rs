//! Error types for the appnera binary.
//!
//! Library failures arrive as [`wrapper::Error`](crate::wrapper::Error) and are
//! wrapped here together with CLI and serialization errors, each with
//! actionable recovery suggestions.

use crate::wrapper::{self, ErrorKind, Field};
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, AppneraError>;

/// Top-level error type of the binary
#[derive(Error, Debug)]
pub enum AppneraError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Provisioning, registry or uninstall errors
    #[error("{0}")]
    Wrapper(#[from] wrapper::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// No installed app has this name
    #[error("No app named '{name}' is installed")]
    AppNotFound {
        /// Display name that was looked up
        name: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl AppneraError {
    /// Short label for the error class, printed before the message.
    pub fn kind_label(&self) -> &'static str {
        match self {
            AppneraError::Wrapper(e) => match e.kind() {
                ErrorKind::Validation => "validation",
                ErrorKind::AlreadyExists => "already exists",
                ErrorKind::NotFound => "not found",
                ErrorKind::RuntimeBuild => "runtime build",
                ErrorKind::Filesystem => "filesystem",
                ErrorKind::Locked => "locked",
                ErrorKind::Template => "template",
                ErrorKind::Other => "error",
            },
            AppneraError::Cli(_) => "usage",
            AppneraError::Io(_) => "io",
            AppneraError::Json(_) | AppneraError::Toml(_) => "format",
            AppneraError::Anyhow(_) => "error",
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            AppneraError::Wrapper(e) => wrapper_suggestions(e),
            AppneraError::Cli(CliError::AppNotFound { .. }) => {
                vec!["Run `appnera list` to see installed apps".to_string()]
            }
            AppneraError::Cli(_) => vec!["Run `appnera --help` for usage".to_string()],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Check if retrying after following the suggestions can succeed
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppneraError::Wrapper(e) if e.residual_path().is_some())
    }
}

fn wrapper_suggestions(error: &wrapper::Error) -> Vec<String> {
    let mut suggestions = Vec::new();
    if let Some(path) = error.residual_path() {
        suggestions.push(format!(
            "Rollback left {} behind; remove it manually before retrying",
            path.display()
        ));
    }
    match error.kind() {
        ErrorKind::Validation => suggestions.push(
            match error.field() {
                Some(Field::Url) => "Pass a full address such as https://example.com",
                Some(Field::Name) => "Pick a non-empty name without '/'",
                Some(Field::Icon) => "Point --icon at an existing, non-empty image file",
                None => "Check the command arguments",
            }
            .to_string(),
        ),
        ErrorKind::AlreadyExists => {
            suggestions.push("Choose a different --name".to_string());
            suggestions.push("Or remove the existing app with `appnera uninstall <NAME>`".to_string());
        }
        ErrorKind::NotFound => {
            suggestions.push("Run `appnera list` to see installed apps".to_string())
        }
        ErrorKind::RuntimeBuild => {
            suggestions.push("Check that python3 and its venv module are installed".to_string());
            suggestions.push("Check network access to the package index".to_string());
        }
        ErrorKind::Filesystem => {
            suggestions.push("Check permissions and free space of the directories involved".to_string());
            suggestions.push("Make sure the template directory holds app.py and uninstall.sh".to_string());
        }
        ErrorKind::Locked => {
            suggestions.push("Wait for the other appnera process to finish, then retry".to_string())
        }
        ErrorKind::Template => {
            suggestions.push("Check the display name and URL for unusual characters".to_string())
        }
        ErrorKind::Other => {
            suggestions.push("Check the error message above for specific details".to_string())
        }
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_suggestions_name_the_field() {
        let err = AppneraError::from(wrapper::Error::validation(Field::Icon, "no icon selected"));
        assert_eq!(err.kind_label(), "validation");
        assert!(err.recovery_suggestions()[0].contains("--icon"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn residual_directory_is_reported_first() {
        let err = AppneraError::from(wrapper::Error::RollbackFailed {
            cause: Box::new(wrapper::Error::Locked { id: "x".into() }),
            path: "/apps/X".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert!(err.recovery_suggestions()[0].contains("/apps/X"));
        assert!(!err.is_recoverable());
    }
}
