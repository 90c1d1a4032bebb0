//! App wrapper provisioning and lifecycle.
//!
//! Turns a `(url, name, icon)` triple into a self-contained desktop
//! application under the base directory, discovers installed wrappers, and
//! removes them again:
//!
//! - [`builder`] - the staged [`Provisioner`]
//! - [`job`] - running a provisioning on the blocking pool
//! - [`registry`] - filesystem-derived list of installed wrappers
//! - [`uninstall`] - the [`Deintegrator`]
//! - [`settings`] - [`Settings`], [`SettingsBuilder`] and the TOML [`ConfigFile`]
//!
//! The app directory is the only state. A wrapper exists exactly when its
//! directory holds both the runtime entry point and the launcher script.

pub mod builder;
pub mod desktop;
pub mod error;
pub mod job;
pub mod lock;
mod manager;
pub mod model;
pub mod registry;
pub mod runtime;
pub mod settings;
pub mod template;
pub mod uninstall;
pub mod utils;
pub mod validate;

pub use builder::{Interpreter, Provisioner, Stage, detect_interpreter};
pub use error::{Error, ErrorKind, Field, ProcessFailure, Result, RuntimeStep};
pub use job::{JobError, JobEvent, JobRunner, ProvisionJob};
pub use manager::AppManager;
pub use model::{AppId, AppLayout, AppRecord, AppSpec};
pub use registry::Registry;
pub use settings::{ConfigFile, Settings, SettingsBuilder};
pub use uninstall::{Deintegrator, UninstallReport};
pub use utils::process::{CommandOutput, ProcessRunner, SystemRunner};
pub use validate::{ValidatedSpec, Validator};
