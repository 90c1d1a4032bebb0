//! Core Settings struct and implementations.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Interpreter used to create the isolated runtime.
pub const DEFAULT_PYTHON: &str = "python3";

/// Packages installed into every isolated runtime.
pub const DEFAULT_DEPENDENCIES: &[&str] = &["PyQt5", "PyQtWebEngine"];

/// freedesktop.org categories written into every desktop entry.
pub const DEFAULT_CATEGORIES: &str = "Network;WebBrowser;";

/// Main settings for provisioning operations.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder); all paths are
/// absolute once built.
///
/// # Examples
///
/// ```no_run
/// use appnera::wrapper::SettingsBuilder;
///
/// # fn example() -> appnera::wrapper::Result<()> {
/// let settings = SettingsBuilder::new()
///     .base_dir("/home/me/.local")
///     .template_dir("/usr/share/appnera/template")
///     .build()?;
/// assert!(settings.base_dir().is_absolute());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Root holding one directory per app wrapper.
    base_dir: PathBuf,

    /// Shared directory the shell reads desktop entries from.
    applications_dir: PathBuf,

    /// Shared directory the shell reads icons from.
    icons_dir: PathBuf,

    /// Read-only runtime payload copied into every app.
    template_dir: PathBuf,

    /// Directory holding per-app lock files.
    lock_dir: PathBuf,

    python: String,

    dependencies: Vec<String>,

    categories: String,

    /// Limit for each runtime build process; `None` waits forever.
    process_timeout: Option<Duration>,
}

impl Settings {
    /// Returns the apps root.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the shared applications directory.
    pub fn applications_dir(&self) -> &Path {
        &self.applications_dir
    }

    /// Returns the shared icons directory.
    pub fn icons_dir(&self) -> &Path {
        &self.icons_dir
    }

    /// Returns the runtime payload directory.
    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Returns the lock file directory.
    pub fn lock_dir(&self) -> &Path {
        &self.lock_dir
    }

    /// Returns the interpreter used for `-m venv`.
    pub fn python(&self) -> &str {
        &self.python
    }

    /// Returns the packages installed into each runtime.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Returns the desktop entry categories.
    pub fn categories(&self) -> &str {
        &self.categories
    }

    /// Returns the per-process timeout, if any.
    pub fn process_timeout(&self) -> Option<Duration> {
        self.process_timeout
    }

    /// Directory of the app wrapper with the given display name.
    pub fn app_dir(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        base_dir: PathBuf,
        applications_dir: PathBuf,
        icons_dir: PathBuf,
        template_dir: PathBuf,
        lock_dir: PathBuf,
        python: String,
        dependencies: Vec<String>,
        categories: String,
        process_timeout: Option<Duration>,
    ) -> Self {
        Self {
            base_dir,
            applications_dir,
            icons_dir,
            template_dir,
            lock_dir,
            python,
            dependencies,
            categories,
            process_timeout,
        }
    }
}
