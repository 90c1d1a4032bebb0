//! Shared helpers for the provisioning components.

pub mod fs;
pub mod process;
