//! Provisioning orchestration.
//!
//! This module provides the [`Provisioner`], which drives one app wrapper
//! from validated inputs to a registered desktop application.

use crate::wrapper::{
    builder::Stage,
    desktop::{DesktopIntegrator, Identity},
    error::{Error, ErrorExt, Result},
    lock::AppLock,
    model::{AppRecord, AppSpec},
    runtime::RuntimeBuilder,
    settings::Settings,
    template::Materializer,
    utils::{fs, process::ProcessRunner},
    validate::{ValidatedSpec, Validator},
};
use std::io;

/// Sequential, blocking provisioning pipeline.
///
/// Runs the stages strictly in order and reports each one to a progress
/// callback as it is reached. Any failure after the app directory exists
/// removes that directory before returning, so the filesystem either holds a
/// complete wrapper or no wrapper at all.
///
/// # Examples
///
/// ```no_run
/// use appnera::wrapper::{AppSpec, Provisioner, SettingsBuilder, SystemRunner};
///
/// # fn example() -> appnera::wrapper::Result<()> {
/// let settings = SettingsBuilder::new().build()?;
/// let runner = SystemRunner;
/// let spec = AppSpec::new("https://notion.so", "Notion", "/tmp/notion.png");
///
/// let record = Provisioner::new(&settings, &runner)
///     .provision(&spec, &mut |stage| println!("{stage}"))?;
/// println!("installed {}", record.dir.display());
/// # Ok(())
/// # }
/// ```
pub struct Provisioner<'a> {
    settings: &'a Settings,
    runner: &'a dyn ProcessRunner,
}

impl std::fmt::Debug for Provisioner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provisioner")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<'a> Provisioner<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn ProcessRunner) -> Self {
        Self { settings, runner }
    }

    /// Provisions one app wrapper.
    ///
    /// Emits `Validating` first. Validation failures, lock contention and
    /// directory collisions return before anything is created and emit
    /// nothing further. Once the app directory exists, the run ends with
    /// either `Complete` or `RolledBack`.
    pub fn provision(
        &self,
        spec: &AppSpec,
        progress: &mut dyn FnMut(Stage),
    ) -> Result<AppRecord> {
        progress(Stage::Validating);
        let valid = Validator::new(self.settings).validate(spec)?;
        log::info!("Provisioning '{}' ({})", valid.name(), valid.id());

        let _lock = AppLock::acquire(self.settings.lock_dir(), valid.id())?;
        self.create_app_dir(&valid)?;
        progress(Stage::DirectoryCreated);

        match self.build(&valid, progress) {
            Ok(()) => {
                progress(Stage::Complete);
                log::info!("'{}' installed at {}", valid.name(), valid.layout().dir().display());
                Ok(AppRecord {
                    name: valid.name().to_string(),
                    id: valid.id().clone(),
                    dir: valid.layout().dir().to_path_buf(),
                })
            }
            Err(cause) => {
                let err = self.roll_back(&valid, cause);
                progress(Stage::RolledBack);
                Err(err)
            }
        }
    }

    /// Creates `<base>/<name>` without creating it twice.
    ///
    /// The validator already checked for a collision; `create_dir` settles a
    /// race with another creator that got there in between.
    fn create_app_dir(&self, valid: &ValidatedSpec) -> Result<()> {
        let base = self.settings.base_dir();
        std::fs::create_dir_all(base).fs_context("creating base directory", base)?;

        let dir = valid.layout().dir();
        match std::fs::create_dir(dir) {
            Ok(()) => {
                log::info!("{}: {}", Stage::DirectoryCreated, dir.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(Error::AlreadyExists {
                name: valid.name().to_string(),
                path: dir.to_path_buf(),
            }),
            Err(e) => Err(e).fs_context("creating app directory", dir),
        }
    }

    fn build(&self, valid: &ValidatedSpec, progress: &mut dyn FnMut(Stage)) -> Result<()> {
        let mut stage = Stage::DirectoryCreated;
        while let Some(next) = stage.next() {
            if next == Stage::Complete {
                break;
            }
            self.run_stage(next, valid)?;
            log::info!("{}", next);
            progress(next);
            stage = next;
        }
        Ok(())
    }

    fn run_stage(&self, stage: Stage, valid: &ValidatedSpec) -> Result<()> {
        let layout = valid.layout();
        let identity = Identity {
            name: valid.name(),
            id: valid.id(),
            url: valid.url(),
        };
        match stage {
            Stage::TemplateCopied => {
                Materializer::new(self.settings.template_dir()).materialize(layout, valid.icon())
            }
            Stage::RuntimeBuilt => {
                RuntimeBuilder::new(self.settings, self.runner).create_environment(layout)
            }
            Stage::DependenciesInstalled => {
                RuntimeBuilder::new(self.settings, self.runner).install_dependencies(layout)
            }
            Stage::LauncherWritten => DesktopIntegrator::new(self.settings)?
                .write_launcher(layout, identity)
                .map(drop),
            Stage::DesktopEntryWritten => DesktopIntegrator::new(self.settings)?
                .write_descriptor(layout, identity)
                .map(drop),
            Stage::Registered => {
                DesktopIntegrator::new(self.settings)?.register(layout, valid.id())
            }
            Stage::Validating | Stage::DirectoryCreated | Stage::Complete | Stage::RolledBack => {
                Ok(())
            }
        }
    }

    /// Removes the half-built app directory exactly once.
    ///
    /// Shared links are left alone; registration is the last fallible step
    /// and a later run replaces them.
    fn roll_back(&self, valid: &ValidatedSpec, cause: Error) -> Error {
        let dir = valid.layout().dir();
        log::warn!("Provisioning '{}' failed: {}", valid.name(), cause);
        match fs::remove_dir_all(dir) {
            Ok(_) => {
                log::info!("Removed {}", dir.display());
                cause
            }
            Err(source) => {
                log::warn!("Rollback could not remove {}: {}", dir.display(), source);
                Error::RollbackFailed {
                    cause: Box::new(cause),
                    path: dir.to_path_buf(),
                    source,
                }
            }
        }
    }
}
