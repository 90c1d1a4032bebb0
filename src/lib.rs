//! Website-to-desktop-app wrapper provisioning.
//!
//! This library turns a URL, a display name and an icon into a
//! self-contained desktop application with its own Python runtime:
//! - staged, rolled-back-on-failure provisioning
//! - discovery of installed wrappers from the filesystem
//! - best-effort uninstall
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod error;
pub mod wrapper;

// Re-export commonly used types
pub use error::{AppneraError, CliError, Result};
