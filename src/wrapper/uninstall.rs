//! App wrapper removal.

use crate::wrapper::{
    desktop::DesktopIntegrator,
    error::{Error, ErrorExt, Result},
    lock::AppLock,
    model::AppRecord,
    settings::Settings,
    utils::fs,
};

/// Which uninstall steps removed something.
///
/// A `false` means the target was already absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UninstallReport {
    pub descriptor_link_removed: bool,
    pub icon_link_removed: bool,
    pub directory_removed: bool,
}

impl UninstallReport {
    /// True when the app was already fully gone.
    pub fn was_absent(&self) -> bool {
        !(self.descriptor_link_removed || self.icon_link_removed || self.directory_removed)
    }
}

/// Removes an app's shared links and its directory.
pub struct Deintegrator<'a> {
    settings: &'a Settings,
}

impl<'a> Deintegrator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Uninstalls `record`.
    ///
    /// Removes the desktop entry link, then the icon link, then the app
    /// directory. Every step is attempted even if an earlier one fails; the
    /// first failure is returned. Removed links are not restored, so a
    /// failed uninstall is simply retried.
    ///
    /// An existing directory holding no wrapper artifact is refused with
    /// [`Error::NotInstalled`] before anything is touched.
    pub fn uninstall(&self, record: &AppRecord) -> Result<UninstallReport> {
        let _lock = AppLock::acquire(self.settings.lock_dir(), &record.id)?;
        let layout = record.layout();
        if layout.dir().exists() && !layout.has_artifacts() {
            return Err(Error::NotInstalled {
                name: record.name.clone(),
                path: record.dir.clone(),
            });
        }
        let integrator = DesktopIntegrator::new(self.settings)?;
        log::info!("Uninstalling '{}' from {}", record.name, record.dir.display());

        let links = integrator.deregister(&record.id);
        let directory =
            fs::remove_dir_all(&record.dir).fs_context("removing app directory", &record.dir);

        if let Err(e) = &links {
            log::warn!("Could not remove shared links: {}", e);
        }
        if let Err(e) = &directory {
            log::warn!("{}", e);
        }

        let links = links?;
        let report = UninstallReport {
            descriptor_link_removed: links.descriptor,
            icon_link_removed: links.icon,
            directory_removed: directory?,
        };
        log::debug!("{:?}", report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::{error::ErrorKind, settings::SettingsBuilder};
    use std::path::Path;

    fn settings(root: &Path) -> Settings {
        SettingsBuilder::new()
            .base_dir(root.join("apps"))
            .applications_dir(root.join("applications"))
            .icons_dir(root.join("icons"))
            .template_dir(root.join("template"))
            .lock_dir(root.join("locks"))
            .build()
            .unwrap()
    }

    #[test]
    fn absent_app_is_already_uninstalled() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        let record = AppRecord::for_name(&settings, "Ghost");

        let report = Deintegrator::new(&settings).uninstall(&record).unwrap();
        assert!(report.was_absent());
    }

    #[cfg(unix)]
    #[test]
    fn removes_links_and_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        let record = AppRecord::for_name(&settings, "My App");
        let layout = record.layout();
        std::fs::create_dir_all(layout.runtime_dir()).unwrap();
        std::fs::write(layout.descriptor(&record.id), "").unwrap();
        std::fs::write(layout.icon(), "").unwrap();
        DesktopIntegrator::new(&settings)
            .unwrap()
            .register(&layout, &record.id)
            .unwrap();

        let report = Deintegrator::new(&settings).uninstall(&record).unwrap();
        assert_eq!(
            report,
            UninstallReport {
                descriptor_link_removed: true,
                icon_link_removed: true,
                directory_removed: true,
            }
        );
        assert!(!record.dir.exists());
        assert!(std::fs::symlink_metadata(settings.applications_dir().join("my-app.desktop")).is_err());

        let again = Deintegrator::new(&settings).uninstall(&record).unwrap();
        assert!(again.was_absent());
    }

    #[cfg(unix)]
    #[test]
    fn dangling_links_are_removed_without_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        let record = AppRecord::for_name(&settings, "Notion");
        std::fs::create_dir_all(settings.icons_dir()).unwrap();
        std::os::unix::fs::symlink(record.layout().icon(), settings.icons_dir().join("notion.png"))
            .unwrap();

        let report = Deintegrator::new(&settings).uninstall(&record).unwrap();
        assert!(report.icon_link_removed);
        assert!(!report.descriptor_link_removed);
        assert!(!report.directory_removed);
    }

    #[test]
    fn refuses_directory_that_is_not_a_wrapper() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        let fonts = settings.app_dir("share").join("fonts");
        std::fs::create_dir_all(&fonts).unwrap();
        std::fs::write(fonts.join("user.ttf"), "font").unwrap();

        let record = AppRecord::for_name(&settings, "share");
        let err = Deintegrator::new(&settings).uninstall(&record).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(std::fs::read_to_string(fonts.join("user.ttf")).unwrap(), "font");
    }

    #[test]
    fn partial_wrapper_is_still_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        let record = AppRecord::for_name(&settings, "Notion");
        std::fs::create_dir_all(record.layout().runtime_dir().join("bin")).unwrap();

        let report = Deintegrator::new(&settings).uninstall(&record).unwrap();
        assert!(report.directory_removed);
        assert!(!record.dir.exists());
    }
}
