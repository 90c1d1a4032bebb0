//! Provisioning stages.

use std::fmt;

/// Progress of one provisioning run.
///
/// Stages are reached strictly in declaration order. [`Stage::RolledBack`]
/// is the single failure state and is only reported once the half-built app
/// directory has been dealt with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Validating,
    DirectoryCreated,
    TemplateCopied,
    RuntimeBuilt,
    DependenciesInstalled,
    LauncherWritten,
    DesktopEntryWritten,
    Registered,
    Complete,
    RolledBack,
}

impl Stage {
    /// Stage following `self` on the success path.
    pub fn next(self) -> Option<Stage> {
        use Stage::*;
        match self {
            Validating => Some(DirectoryCreated),
            DirectoryCreated => Some(TemplateCopied),
            TemplateCopied => Some(RuntimeBuilt),
            RuntimeBuilt => Some(DependenciesInstalled),
            DependenciesInstalled => Some(LauncherWritten),
            LauncherWritten => Some(DesktopEntryWritten),
            DesktopEntryWritten => Some(Registered),
            Registered => Some(Complete),
            Complete | RolledBack => None,
        }
    }

    /// Human readable description, used for progress output.
    pub fn description(self) -> &'static str {
        match self {
            Stage::Validating => "Validating inputs",
            Stage::DirectoryCreated => "Created app directory",
            Stage::TemplateCopied => "Copied runtime payload and icon",
            Stage::RuntimeBuilt => "Built isolated runtime",
            Stage::DependenciesInstalled => "Installed dependencies",
            Stage::LauncherWritten => "Wrote launcher script",
            Stage::DesktopEntryWritten => "Wrote desktop entry",
            Stage::Registered => "Registered with the desktop",
            Stage::Complete => "Complete",
            Stage::RolledBack => "Rolled back",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
