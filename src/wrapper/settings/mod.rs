//! Configuration for provisioning operations.
//!
//! [`Settings`] is the explicit service configuration every component reads
//! its directories and tool choices from. It is built once with
//! [`SettingsBuilder`], optionally seeded from a TOML [`ConfigFile`], and
//! then shared by reference.

mod builder;
mod core;
mod file;

pub use builder::SettingsBuilder;
pub use core::{
    DEFAULT_CATEGORIES, DEFAULT_DEPENDENCIES, DEFAULT_PYTHON, Settings,
};
pub use file::ConfigFile;
