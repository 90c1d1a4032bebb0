//! File system utilities for provisioning.
//!
//! Idempotent removal, verified copies and symlink replacement. Everything
//! here is blocking; callers run on a worker thread.

use crate::wrapper::error::{Error, ErrorExt, Result};
use std::{
    fs,
    io,
    path::Path,
};

/// Removes the directory and its contents if it exists.
///
/// Returns whether anything was removed.
pub fn remove_dir_all(path: &Path) -> io::Result<bool> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Removes a file or symlink (dangling or not) if present.
///
/// Returns whether anything was removed. A real directory at `path` is an
/// error, never removed.
pub fn remove_link(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).fs_context("inspecting link", path),
    };
    if metadata.is_dir() {
        return Err(Error::Fs {
            context: "refusing to remove directory",
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::IsADirectory),
        });
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).fs_context("removing link", path),
    }
}

/// Checks that `path` is a regular file that can be opened for reading.
pub fn ensure_readable_file(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).fs_context("reading source", path)?;
    if !metadata.is_file() {
        return Err(Error::Fs {
            context: "source is not a regular file",
            path: path.to_path_buf(),
            source: io::Error::from(io::ErrorKind::InvalidInput),
        });
    }
    fs::File::open(path).fs_context("opening source", path)?;
    Ok(())
}

/// Copies a regular file from one path to another.
///
/// The source is verified readable first; the destination's parent must
/// exist.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    ensure_readable_file(from)?;
    fs::copy(from, to).fs_context("copying file to", to)?;
    Ok(())
}

/// Writes `contents` to `path`, replacing any existing file.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).fs_context("writing", path)
}

/// Sets mode 0755.
#[cfg(unix)]
pub fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .fs_context("setting executable permission on", path)
}

#[cfg(not(unix))]
pub fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Points `link` at `target`, replacing whatever entry had that name.
///
/// Creates the link's parent directory if needed.
pub fn replace_symlink(target: &Path, link: &Path) -> Result<()> {
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).fs_context("creating directory", parent)?;
    }
    if remove_link(link)? {
        log::debug!("Replaced existing link {}", link.display());
    }
    symlink_file(target, link).fs_context("creating symlink", link)
}
