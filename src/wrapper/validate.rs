//! Input validation for app creation.
//!
//! Runs before any side effect and stops at the first failing check: first
//! presence of url, name and icon, then their format in the same order, then
//! the target directory.

use crate::wrapper::{
    error::{Error, Field, Result},
    model::{AppId, AppLayout, AppSpec},
    settings::Settings,
};
use std::path::{Path, PathBuf};

/// An [`AppSpec`] that passed validation, with its derived values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSpec {
    url: String,
    name: String,
    icon: PathBuf,
    id: AppId,
    layout: AppLayout,
}

impl ValidatedSpec {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn icon(&self) -> &Path {
        &self.icon
    }

    pub fn id(&self) -> &AppId {
        &self.id
    }

    pub fn layout(&self) -> &AppLayout {
        &self.layout
    }
}

/// Checks creation inputs against the configured base directory.
pub struct Validator<'a> {
    settings: &'a Settings,
}

impl<'a> Validator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Validates `spec`, trimming the url and name.
    pub fn validate(&self, spec: &AppSpec) -> Result<ValidatedSpec> {
        require_present(spec)?;
        let url = validate_url(&spec.url)?;
        let name = validate_name(&spec.name)?;
        validate_icon(&spec.icon)?;

        let dir = self.settings.app_dir(name);
        // symlink_metadata so a dangling symlink with the app's name also counts
        if std::fs::symlink_metadata(&dir).is_ok() {
            return Err(Error::AlreadyExists {
                name: name.to_string(),
                path: dir,
            });
        }

        Ok(ValidatedSpec {
            url: url.to_string(),
            name: name.to_string(),
            icon: spec.icon.clone(),
            id: AppId::from_name(name),
            layout: AppLayout::new(dir),
        })
    }
}

fn require_present(spec: &AppSpec) -> Result<()> {
    if spec.url.trim().is_empty() {
        return Err(Error::validation(Field::Url, "must not be empty"));
    }
    if spec.name.trim().is_empty() {
        return Err(Error::validation(Field::Name, "must not be empty"));
    }
    if spec.icon.as_os_str().is_empty() {
        return Err(Error::validation(Field::Icon, "no icon selected"));
    }
    Ok(())
}

fn validate_url(raw: &str) -> Result<&str> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(Error::validation(Field::Url, "must not be empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::validation(
            Field::Url,
            "must start with http:// or https://",
        ));
    }
    match url::Url::parse(url) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => Ok(url),
        Ok(_) => Err(Error::validation(Field::Url, "must include a host")),
        Err(e) => Err(Error::validation(Field::Url, format!("not a valid URL: {e}"))),
    }
}

pub(crate) fn validate_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(Error::validation(Field::Name, "must not be empty"));
    }
    if name == "." || name == ".." || name.contains('/') || name.contains('\0') {
        return Err(Error::validation(
            Field::Name,
            "must be usable as a directory name (no '/', not '.' or '..')",
        ));
    }
    Ok(name)
}

fn validate_icon(icon: &Path) -> Result<()> {
    if icon.as_os_str().is_empty() {
        return Err(Error::validation(Field::Icon, "no icon selected"));
    }
    let metadata = std::fs::metadata(icon).map_err(|e| {
        Error::validation(Field::Icon, format!("{} not found: {e}", icon.display()))
    })?;
    if !metadata.is_file() {
        return Err(Error::validation(
            Field::Icon,
            format!("{} is not a file", icon.display()),
        ));
    }
    if metadata.len() == 0 {
        return Err(Error::validation(
            Field::Icon,
            format!("{} is empty", icon.display()),
        ));
    }
    Ok(())
}
