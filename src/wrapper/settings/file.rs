//! TOML configuration file.

use crate::wrapper::error::{Error, ErrorExt, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// On-disk configuration, every key optional.
///
/// # Configuration
///
/// `~/.config/appnera/config.toml`:
///
/// ```toml
/// base_dir = "~/.local"
/// template_dir = "/usr/share/appnera/template"
/// python = "python3.12"
/// dependencies = ["PyQt5", "PyQtWebEngine"]
/// process_timeout_secs = 900
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    #[serde(default)]
    pub applications_dir: Option<PathBuf>,

    #[serde(default)]
    pub icons_dir: Option<PathBuf>,

    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    #[serde(default)]
    pub lock_dir: Option<PathBuf>,

    #[serde(default)]
    pub python: Option<String>,

    #[serde(default)]
    pub dependencies: Option<Vec<String>>,

    #[serde(default)]
    pub categories: Option<String>,

    /// Timeout for each runtime build process, in seconds.
    #[serde(default)]
    pub process_timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Default location: `$XDG_CONFIG_HOME/appnera/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("appnera").join("config.toml"))
    }

    /// Parses a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).fs_context("reading config file", path)?;
        Self::parse(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the file at `path` if it exists, otherwise returns defaults.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            log::debug!("No config file at {}", path.display());
            Ok(Self::default())
        }
    }

    fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        let mut config: ConfigFile = toml::from_str(text)?;
        for path in [
            &mut config.base_dir,
            &mut config.applications_dir,
            &mut config.icons_dir,
            &mut config.template_dir,
            &mut config.lock_dir,
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_tilde(path);
        }
        Ok(config)
    }
}

/// Expands a leading `~` to the home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
