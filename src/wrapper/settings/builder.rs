//! Builder for constructing Settings.

use super::{ConfigFile, DEFAULT_CATEGORIES, DEFAULT_DEPENDENCIES, DEFAULT_PYTHON, Settings};
use crate::{
    bail,
    wrapper::error::{Context, ErrorExt, Result},
};
use path_absolutize::Absolutize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Builder for constructing [`Settings`].
///
/// Unset directories fall back to XDG locations:
///
/// | setting            | default                              |
/// |--------------------|--------------------------------------|
/// | `base_dir`         | `~/.local`                           |
/// | `applications_dir` | `$XDG_DATA_HOME/applications`        |
/// | `icons_dir`        | `$XDG_DATA_HOME/icons`               |
/// | `template_dir`     | `$XDG_DATA_HOME/appnera/template`    |
/// | `lock_dir`         | `$XDG_RUNTIME_DIR/appnera` (or tmp)  |
///
/// # Examples
///
/// ```no_run
/// use appnera::wrapper::{ConfigFile, SettingsBuilder};
///
/// # fn example() -> appnera::wrapper::Result<()> {
/// let file = ConfigFile::load_optional(&ConfigFile::default_path().unwrap())?;
/// let settings = SettingsBuilder::new()
///     .config_file(file)
///     .python("python3.12")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    base_dir: Option<PathBuf>,
    applications_dir: Option<PathBuf>,
    icons_dir: Option<PathBuf>,
    template_dir: Option<PathBuf>,
    lock_dir: Option<PathBuf>,
    python: Option<String>,
    dependencies: Option<Vec<String>>,
    categories: Option<String>,
    process_timeout: Option<Duration>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Seeds every field the file sets. Later setter calls take precedence.
    pub fn config_file(mut self, file: ConfigFile) -> Self {
        self.base_dir = file.base_dir.or(self.base_dir);
        self.applications_dir = file.applications_dir.or(self.applications_dir);
        self.icons_dir = file.icons_dir.or(self.icons_dir);
        self.template_dir = file.template_dir.or(self.template_dir);
        self.lock_dir = file.lock_dir.or(self.lock_dir);
        self.python = file.python.or(self.python);
        self.dependencies = file.dependencies.or(self.dependencies);
        self.categories = file.categories.or(self.categories);
        self.process_timeout = file
            .process_timeout_secs
            .map(Duration::from_secs)
            .or(self.process_timeout);
        self
    }

    /// Sets the apps root.
    pub fn base_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.base_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the shared applications directory.
    pub fn applications_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.applications_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the shared icons directory.
    pub fn icons_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.icons_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the runtime payload directory.
    pub fn template_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.template_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the lock file directory.
    pub fn lock_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.lock_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the interpreter used to create runtimes.
    ///
    /// Default: `python3`
    pub fn python(mut self, python: impl Into<String>) -> Self {
        self.python = Some(python.into());
        self
    }

    /// Sets the packages installed into each runtime.
    ///
    /// Default: `PyQt5 PyQtWebEngine`
    pub fn dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = Some(deps.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the desktop entry categories.
    pub fn categories(mut self, categories: impl Into<String>) -> Self {
        self.categories = Some(categories.into());
        self
    }

    /// Sets a timeout for each runtime build process.
    ///
    /// Default: none
    pub fn process_timeout(mut self, timeout: Duration) -> Self {
        self.process_timeout = Some(timeout);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Fails when a default directory cannot be determined (no home
    /// directory), a path cannot be made absolute, or the interpreter or
    /// dependency list is empty.
    pub fn build(self) -> Result<Settings> {
        let python = self.python.unwrap_or_else(|| DEFAULT_PYTHON.to_string());
        if python.trim().is_empty() {
            bail!("python interpreter must not be empty");
        }
        let dependencies = self
            .dependencies
            .unwrap_or_else(|| DEFAULT_DEPENDENCIES.iter().map(|d| d.to_string()).collect());
        if dependencies.is_empty() {
            bail!("at least one runtime dependency is required");
        }

        let base_dir = match self.base_dir {
            Some(dir) => dir,
            None => dirs::home_dir()
                .context("cannot determine home directory for the apps root")?
                .join(".local"),
        };
        let data_dir = || dirs::data_dir().context("cannot determine XDG data directory");
        let applications_dir = match self.applications_dir {
            Some(dir) => dir,
            None => data_dir()?.join("applications"),
        };
        let icons_dir = match self.icons_dir {
            Some(dir) => dir,
            None => data_dir()?.join("icons"),
        };
        let template_dir = match self.template_dir {
            Some(dir) => dir,
            None => data_dir()?.join("appnera").join("template"),
        };
        let lock_dir = self.lock_dir.unwrap_or_else(|| {
            dirs::runtime_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("appnera")
        });

        Ok(Settings::new(
            absolute(base_dir)?,
            absolute(applications_dir)?,
            absolute(icons_dir)?,
            absolute(template_dir)?,
            absolute(lock_dir)?,
            python,
            dependencies,
            self.categories
                .unwrap_or_else(|| DEFAULT_CATEGORIES.to_string()),
            self.process_timeout,
        ))
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    Ok(path
        .absolutize()
        .fs_context("resolving absolute path", &path)?
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_values_win_over_defaults() {
        let settings = SettingsBuilder::new()
            .base_dir("/srv/apps")
            .applications_dir("/srv/share/applications")
            .icons_dir("/srv/share/icons")
            .template_dir("/srv/template")
            .lock_dir("/srv/locks")
            .python("python3.12")
            .dependencies(["PyQt6"])
            .process_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(settings.base_dir(), Path::new("/srv/apps"));
        assert_eq!(settings.app_dir("Notion"), Path::new("/srv/apps/Notion"));
        assert_eq!(settings.python(), "python3.12");
        assert_eq!(settings.dependencies(), ["PyQt6".to_string()]);
        assert_eq!(settings.categories(), DEFAULT_CATEGORIES);
        assert_eq!(settings.process_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn relative_paths_become_absolute() {
        let settings = SettingsBuilder::new()
            .base_dir("apps")
            .applications_dir("share/applications")
            .icons_dir("share/icons")
            .template_dir("template")
            .lock_dir("locks")
            .build()
            .unwrap();
        assert!(settings.base_dir().is_absolute());
        assert!(settings.template_dir().ends_with("template"));
    }

    #[test]
    fn setters_override_config_file() {
        let file = ConfigFile {
            python: Some("python3.11".into()),
            template_dir: Some("/from/file".into()),
            process_timeout_secs: Some(30),
            ..Default::default()
        };
        let settings = SettingsBuilder::new()
            .config_file(file)
            .python("python3.13")
            .base_dir("/b")
            .applications_dir("/a")
            .icons_dir("/i")
            .lock_dir("/l")
            .build()
            .unwrap();
        assert_eq!(settings.python(), "python3.13");
        assert_eq!(settings.template_dir(), Path::new("/from/file"));
        assert_eq!(settings.process_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            settings.dependencies(),
            ["PyQt5".to_string(), "PyQtWebEngine".to_string()]
        );
    }

    #[test]
    fn empty_dependency_list_is_rejected() {
        let err = SettingsBuilder::new()
            .base_dir("/b")
            .applications_dir("/a")
            .icons_dir("/i")
            .template_dir("/t")
            .lock_dir("/l")
            .dependencies(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("dependency"));
    }
}
