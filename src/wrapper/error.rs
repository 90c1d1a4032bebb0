//! Error types for app wrapper provisioning.
//!
//! Every failure in the pipeline is terminal for the current job. The
//! [`ErrorKind`] classification is what controllers branch on; the `Display`
//! output carries enough detail (including captured process output) to
//! diagnose a failure without inspecting the filesystem.

use std::{
    fmt,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for wrapper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Input field named by a validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Url,
    Name,
    Icon,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Url => "url",
            Field::Name => "name",
            Field::Icon => "icon",
        })
    }
}

/// Which external invocation of the runtime build failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeStep {
    /// `python -m venv`
    CreateEnvironment,
    /// `pip install`
    InstallDependencies,
}

impl fmt::Display for RuntimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuntimeStep::CreateEnvironment => "environment creation",
            RuntimeStep::InstallDependencies => "dependency installation",
        })
    }
}

/// Diagnostic record of a failed runtime build invocation.
#[derive(Debug, Clone)]
pub struct ProcessFailure {
    pub step: RuntimeStep,
    /// Rendered command line.
    pub command: String,
    /// Exit code, `None` when the process never ran, timed out or was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl fmt::Display for ProcessFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(code) => write!(f, "{} failed (exit code {}): {}", self.step, code, self.command)?,
            None => write!(f, "{} failed: {}", self.step, self.command)?,
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            write!(f, "\n--- stdout ---\n{stdout}")?;
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, "\n--- stderr ---\n{stderr}")?;
        }
        Ok(())
    }
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    AlreadyExists,
    NotFound,
    RuntimeBuild,
    Filesystem,
    Locked,
    Template,
    Other,
}

/// Main error type for all wrapper operations
#[derive(Error, Debug)]
pub enum Error {
    /// An input failed validation; nothing was touched.
    #[error("invalid {field}: {reason}")]
    Validation { field: Field, reason: String },

    /// The target app directory is already present.
    #[error("app '{name}' already exists at {}", path.display())]
    AlreadyExists { name: String, path: PathBuf },

    /// Nothing under the base directory is an app wrapper with this name.
    #[error("no app wrapper named '{name}' at {}", path.display())]
    NotInstalled { name: String, path: PathBuf },

    /// The isolated runtime could not be built.
    #[error("runtime build failed: {0}")]
    RuntimeBuild(Box<ProcessFailure>),

    /// A filesystem operation failed.
    #[error("{context} {}: {source}", path.display())]
    Fs {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another job holds the lock for this app id.
    #[error("app id '{id}' is locked by another job")]
    Locked { id: String },

    /// The build failed and removing the half-built directory failed too.
    #[error("{cause}; rollback could not remove {}: {source}", path.display())]
    RollbackFailed {
        cause: Box<Error>,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Launcher or desktop entry template could not be registered.
    #[error("template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    /// Launcher or desktop entry could not be rendered.
    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("{0}")]
    GenericError(String),
}

impl Error {
    pub fn validation(field: Field, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Classifies the error; a failed rollback reports the kind of its cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } => ErrorKind::Validation,
            Error::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Error::RuntimeBuild(_) => ErrorKind::RuntimeBuild,
            Error::NotInstalled { .. } => ErrorKind::NotFound,
            Error::Fs { .. } => ErrorKind::Filesystem,
            Error::Locked { .. } => ErrorKind::Locked,
            Error::RollbackFailed { cause, .. } => cause.kind(),
            Error::Template(_) | Error::Render(_) => ErrorKind::Template,
            Error::Config { .. } | Error::GenericError(_) => ErrorKind::Other,
        }
    }

    /// Field named by a validation failure.
    pub fn field(&self) -> Option<Field> {
        match self {
            Error::Validation { field, .. } => Some(*field),
            Error::RollbackFailed { cause, .. } => cause.field(),
            _ => None,
        }
    }

    /// Directory left behind by a failed rollback.
    pub fn residual_path(&self) -> Option<&Path> {
        match self {
            Error::RollbackFailed { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Attaches an operation description and a path to IO errors.
pub trait ErrorExt<T> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Fs {
            context,
            path: path.into(),
            source,
        })
    }
}

/// Converts `None` into a [`Error::GenericError`].
pub trait Context<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: fmt::Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Returns early with a [`Error::GenericError`].
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::wrapper::Error::GenericError(format!($msg)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::wrapper::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_context_keeps_path_and_operation() {
        let err = Err::<(), _>(io::Error::from(io::ErrorKind::PermissionDenied))
            .fs_context("removing app directory", "/tmp/Notion")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        let msg = err.to_string();
        assert!(msg.starts_with("removing app directory /tmp/Notion"));
    }

    #[test]
    fn rollback_failure_reports_cause_kind() {
        let cause = Error::RuntimeBuild(Box::new(ProcessFailure {
            step: RuntimeStep::InstallDependencies,
            command: "pip install PyQt5".into(),
            status: Some(1),
            stdout: String::new(),
            stderr: "no network".into(),
        }));
        let err = Error::RollbackFailed {
            cause: Box::new(cause),
            path: PathBuf::from("/tmp/Notion"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.kind(), ErrorKind::RuntimeBuild);
        assert_eq!(err.residual_path(), Some(Path::new("/tmp/Notion")));
        assert!(err.to_string().contains("no network"));
    }

    #[test]
    fn validation_error_names_field() {
        let err = Error::validation(Field::Url, "must not be empty");
        assert_eq!(err.field(), Some(Field::Url));
        assert_eq!(err.to_string(), "invalid url: must not be empty");
    }
}
