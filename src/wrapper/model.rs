//! App wrapper data model and on-disk layout.

use crate::wrapper::settings::Settings;
use serde::Serialize;
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Runtime entry point copied from the template.
pub const ENTRY_POINT: &str = "app.py";
/// Uninstall helper copied from the template.
pub const UNINSTALL_HELPER: &str = "uninstall.sh";
/// Generated launcher script.
pub const LAUNCHER: &str = "run.sh";
/// Icon file name inside the app directory, whatever the source extension.
pub const ICON: &str = "icon.png";
/// Isolated runtime root inside the app directory.
pub const RUNTIME_DIR: &str = "venv";

/// Creation request supplied by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSpec {
    pub url: String,
    pub name: String,
    pub icon: PathBuf,
}

impl AppSpec {
    pub fn new(url: impl Into<String>, name: impl Into<String>, icon: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// Identifier used to name shared desktop-integration artifacts.
///
/// Derived from the display name by lowercasing and turning spaces into
/// hyphens. Distinct names can map to the same id ("My App" and "my-app");
/// only directory names are checked for collisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    pub fn from_name(name: &str) -> Self {
        Self(name.to_lowercase().replace(' ', "-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<id>.desktop`
    pub fn desktop_file_name(&self) -> String {
        format!("{}.desktop", self.0)
    }

    /// `<id>.png`
    pub fn icon_file_name(&self) -> String {
        format!("{}.png", self.0)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Paths of every artifact inside one app directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppLayout {
    dir: PathBuf,
}

impl AppLayout {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_point(&self) -> PathBuf {
        self.dir.join(ENTRY_POINT)
    }

    pub fn uninstall_helper(&self) -> PathBuf {
        self.dir.join(UNINSTALL_HELPER)
    }

    pub fn launcher(&self) -> PathBuf {
        self.dir.join(LAUNCHER)
    }

    pub fn icon(&self) -> PathBuf {
        self.dir.join(ICON)
    }

    pub fn runtime_dir(&self) -> PathBuf {
        self.dir.join(RUNTIME_DIR)
    }

    /// Interpreter inside the isolated runtime.
    pub fn python(&self) -> PathBuf {
        self.runtime_dir().join("bin").join("python")
    }

    /// Package installer inside the isolated runtime.
    pub fn pip(&self) -> PathBuf {
        self.runtime_dir().join("bin").join("pip")
    }

    pub fn descriptor(&self, id: &AppId) -> PathBuf {
        self.dir.join(id.desktop_file_name())
    }

    /// True when both registry marker files are present.
    pub fn has_markers(&self) -> bool {
        self.entry_point().is_file() && self.launcher().is_file()
    }

    /// True when any wrapper artifact is left: entry point, launcher or
    /// runtime. A directory without one is not ours to remove.
    pub fn has_artifacts(&self) -> bool {
        self.entry_point().is_file() || self.launcher().is_file() || self.runtime_dir().is_dir()
    }
}

/// An installed app wrapper, reconstructed from the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppRecord {
    pub name: String,
    pub id: AppId,
    #[serde(rename = "path")]
    pub dir: PathBuf,
}

impl AppRecord {
    /// Record for the app directory `<base>/<name>`, whether or not it exists.
    pub fn for_name(settings: &Settings, name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: AppId::from_name(name),
            dir: settings.app_dir(name),
        }
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::new(&self.dir)
    }

    /// Total size in bytes of the regular files under the app directory.
    pub fn disk_usage(&self) -> u64 {
        walkdir::WalkDir::new(&self.dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.metadata().ok())
            .map(|m| m.len())
            .sum()
    }
}
