//! Entry point tying settings, process execution and the pipeline together.

use crate::wrapper::{
    builder::{Provisioner, Stage},
    error::{Error, Result},
    job::{JobError, JobRunner, ProvisionJob},
    model::{AppRecord, AppSpec},
    registry::Registry,
    settings::Settings,
    uninstall::{Deintegrator, UninstallReport},
    utils::process::{ProcessRunner, SystemRunner},
    validate,
};
use std::sync::Arc;

/// Owns the configuration shared by every wrapper operation.
///
/// ```no_run
/// use appnera::wrapper::{AppManager, SettingsBuilder};
///
/// # fn example() -> appnera::wrapper::Result<()> {
/// let manager = AppManager::new(SettingsBuilder::new().build()?);
/// for app in manager.list()? {
///     println!("{} -> {}", app.name, app.dir.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AppManager {
    settings: Settings,
    runner: Arc<dyn ProcessRunner>,
    jobs: JobRunner,
}

impl std::fmt::Debug for AppManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppManager")
            .field("settings", &self.settings)
            .field("jobs", &self.jobs)
            .finish_non_exhaustive()
    }
}

impl AppManager {
    /// Manager running real processes.
    pub fn new(settings: Settings) -> Self {
        Self::with_runner(settings, Arc::new(SystemRunner))
    }

    /// Manager with a custom process runner.
    pub fn with_runner(settings: Settings, runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            settings,
            runner,
            jobs: JobRunner::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Provisions on the calling thread.
    pub fn provision(&self, spec: &AppSpec, progress: &mut dyn FnMut(Stage)) -> Result<AppRecord> {
        Provisioner::new(&self.settings, self.runner.as_ref()).provision(spec, progress)
    }

    /// Provisions on the blocking pool; refused while another job from this
    /// manager is running.
    pub fn submit(&self, spec: AppSpec) -> std::result::Result<ProvisionJob, JobError> {
        self.jobs
            .submit(self.settings.clone(), Arc::clone(&self.runner), spec)
    }

    pub fn is_busy(&self) -> bool {
        self.jobs.is_busy()
    }

    /// Installed apps, sorted by name.
    pub fn list(&self) -> Result<Vec<AppRecord>> {
        Registry::new(&self.settings).list()
    }

    pub fn find(&self, name: &str) -> Option<AppRecord> {
        Registry::new(&self.settings).find(name)
    }

    pub fn uninstall(&self, record: &AppRecord) -> Result<UninstallReport> {
        Deintegrator::new(&self.settings).uninstall(record)
    }

    /// Uninstalls by display name.
    ///
    /// The name must resolve to an installed app, or to a partially removed
    /// one whose directory still holds a wrapper artifact. Anything else is
    /// [`Error::NotInstalled`] and nothing is touched.
    pub fn uninstall_named(&self, name: &str) -> Result<UninstallReport> {
        let name = validate::validate_name(name)?;
        let record = match self.find(name) {
            Some(record) => record,
            None => {
                let record = AppRecord::for_name(&self.settings, name);
                if !record.layout().has_artifacts() {
                    return Err(Error::NotInstalled {
                        name: record.name,
                        path: record.dir,
                    });
                }
                log::info!("'{}' is partially installed, cleaning up", name);
                record
            }
        };
        self.uninstall(&record)
    }
}
