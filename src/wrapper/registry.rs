//! Discovery of installed app wrappers.
//!
//! Nothing is cached or stored. Every call re-reads the base directory, and
//! a subdirectory counts as an installed app only when it holds both the
//! runtime entry point and the launcher script.

use crate::wrapper::{
    error::{ErrorExt, Result},
    model::{AppId, AppLayout, AppRecord},
    settings::Settings,
};
use std::io;

/// Read-only view of the base directory.
#[derive(Debug, Clone, Copy)]
pub struct Registry<'a> {
    settings: &'a Settings,
}

impl<'a> Registry<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Installed apps, sorted by name. A missing base directory is empty.
    pub fn list(&self) -> Result<Vec<AppRecord>> {
        let base = self.settings.base_dir();
        let entries = match std::fs::read_dir(base) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("Base directory {} does not exist", base.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).fs_context("reading base directory", base),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.fs_context("reading base directory", base)?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                log::debug!("Skipping non UTF-8 entry {}", path.display());
                continue;
            };
            if !AppLayout::new(&path).has_markers() {
                log::debug!("Skipping {}: not an app wrapper", path.display());
                continue;
            }
            records.push(AppRecord {
                id: AppId::from_name(&name),
                name,
                dir: path,
            });
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    /// The installed app named exactly `name`, if any.
    pub fn find(&self, name: &str) -> Option<AppRecord> {
        let record = AppRecord::for_name(self.settings, name);
        record.layout().has_markers().then_some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrapper::{model::{ENTRY_POINT, LAUNCHER}, settings::SettingsBuilder};
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

    fn install(settings: &Settings, name: &str, files: &[&str]) {
        let dir = settings.app_dir(name);
        std::fs::create_dir_all(&dir).unwrap();
        for file in files {
            std::fs::write(dir.join(file), "").unwrap();
        }
    }

    #[test]
    fn missing_base_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        assert!(Registry::new(&settings).list().unwrap().is_empty());
    }

    #[test]
    fn only_complete_wrappers_are_listed_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        install(&settings, "Zulip", &[ENTRY_POINT, LAUNCHER]);
        install(&settings, "Notion", &[ENTRY_POINT, LAUNCHER]);
        install(&settings, "Half", &[ENTRY_POINT]);
        install(&settings, "Other", &["notes.txt"]);
        std::fs::write(settings.base_dir().join("stray-file"), "").unwrap();

        let names: Vec<_> = Registry::new(&settings)
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Notion", "Zulip"]);
    }

    #[test]
    fn find_requires_markers() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = settings(tmp.path());
        install(&settings, "My App", &[ENTRY_POINT, LAUNCHER]);
        install(&settings, "Half", &[LAUNCHER]);

        let registry = Registry::new(&settings);
        let found = registry.find("My App").unwrap();
        assert_eq!(found.id.as_str(), "my-app");
        assert_eq!(found.dir, settings.app_dir("My App"));
        assert!(registry.find("Half").is_none());
        assert!(registry.find("Missing").is_none());
    }
}
