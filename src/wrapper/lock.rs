//! Per-app advisory locks.
//!
//! Provisioning and uninstalling the same [`AppId`] are mutually exclusive,
//! across jobs in one process and across processes. The lock is an `flock`
//! on `<lock_dir>/<id>.lock`, taken without blocking; contention is reported
//! as [`Error::Locked`]. Lock files are never deleted.

use crate::wrapper::{
    error::{Error, ErrorExt, Result},
    model::AppId,
};
use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

/// Held lock; released on drop.
pub struct AppLock {
    path: PathBuf,
    #[cfg(unix)]
    _lock: nix::fcntl::Flock<File>,
    #[cfg(not(unix))]
    _file: File,
}

impl AppLock {
    /// Takes the lock for `id` or fails immediately.
    pub fn acquire(lock_dir: &Path, id: &AppId) -> Result<Self> {
        std::fs::create_dir_all(lock_dir).fs_context("creating lock directory", lock_dir)?;
        let path = lock_dir.join(format!("{}.lock", id));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .fs_context("opening lock file", &path)?;

        Self::lock(file, path, id)
    }

    #[cfg(unix)]
    fn lock(file: File, path: PathBuf, id: &AppId) -> Result<Self> {
        use nix::{
            errno::Errno,
            fcntl::{Flock, FlockArg},
        };
        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(lock) => {
                log::debug!("Acquired {}", path.display());
                Ok(Self { path, _lock: lock })
            }
            Err((_, Errno::EWOULDBLOCK)) => Err(Error::Locked { id: id.to_string() }),
            Err((_, errno)) => Err(std::io::Error::from(errno)).fs_context("locking", &path),
        }
    }

    #[cfg(not(unix))]
    fn lock(file: File, path: PathBuf, _id: &AppId) -> Result<Self> {
        Ok(Self { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for AppLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppLock").field("path", &self.path).finish()
    }
}

impl Drop for AppLock {
    fn drop(&mut self) {
        log::debug!("Released {}", self.path.display());
    }
}
