//! Runtime payload materialization.

use crate::wrapper::{
    error::Result,
    model::{AppLayout, ENTRY_POINT, UNINSTALL_HELPER},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// One file of the runtime payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadFile {
    pub name: &'static str,
    pub executable: bool,
}

/// Files copied from the template directory into every app, in copy order.
pub const PAYLOAD: &[PayloadFile] = &[
    PayloadFile {
        name: ENTRY_POINT,
        executable: true,
    },
    PayloadFile {
        name: UNINSTALL_HELPER,
        executable: true,
    },
];

/// Copies the runtime payload and the user's icon into an app directory.
pub struct Materializer<'a> {
    template_dir: &'a Path,
}

impl<'a> Materializer<'a> {
    pub fn new(template_dir: &'a Path) -> Self {
        Self { template_dir }
    }

    /// Payload sources that are missing or unreadable.
    pub fn missing_payload(&self) -> Vec<PathBuf> {
        PAYLOAD
            .iter()
            .map(|file| self.template_dir.join(file.name))
            .filter(|src| fs::ensure_readable_file(src).is_err())
            .collect()
    }

    /// Copies every payload file, then the icon as `icon.png`.
    pub fn materialize(&self, layout: &AppLayout, icon: &Path) -> Result<()> {
        for file in PAYLOAD {
            let src = self.template_dir.join(file.name);
            let dst = layout.dir().join(file.name);
            fs::copy_file(&src, &dst)?;
            if file.executable {
                fs::set_executable(&dst)?;
            }
            log::debug!("Copied {} -> {}", src.display(), dst.display());
        }

        // the icon path is user input and may have vanished since validation
        fs::copy_file(icon, &layout.icon())?;
        log::debug!("Copied icon {}", icon.display());
        Ok(())
    }
}
