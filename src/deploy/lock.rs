// ABOUTME: Deploy lock to prevent concurrent deployments of the same app.
// ABOUTME: Uses atomic file creation with lock info stored in ~/.local/state/hoist/.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::types::AppName;

use super::DeployError;

/// State directory below `$HOME` when `XDG_STATE_HOME` is unset.
const STATE_DIR: &str = ".local/state";

const APP_DIR: &str = "hoist";

/// Information about who holds a deploy lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Hostname of the machine that holds the lock.
    pub holder: String,
    /// Process ID of the lock holder.
    pub pid: u32,
    /// When the lock was acquired.
    pub started_at: DateTime<Utc>,
    /// App being deployed.
    pub app: String,
}

impl LockInfo {
    /// Create new lock info for the current process.
    pub fn new(app: &AppName) -> Self {
        Self {
            holder: gethostname::gethostname().to_string_lossy().into_owned(),
            pid: std::process::id(),
            started_at: Utc::now(),
            app: app.to_string(),
        }
    }

    /// Check if this lock is stale (older than 1 hour).
    pub fn is_stale(&self) -> bool {
        let age = Utc::now() - self.started_at;
        age.num_hours() >= 1
    }

    /// Path to the lock file for an app inside `dir`.
    pub fn lock_path(dir: &Path, app: &AppName) -> PathBuf {
        dir.join(format!("{}.lock", app))
    }
}

/// Directory holding lock files (XDG Base Directory compliant).
pub fn state_dir() -> Result<PathBuf, DeployError> {
    if let Some(xdg) = std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(STATE_DIR).join(APP_DIR))
        .ok_or_else(|| DeployError::lock_error("cannot locate state directory: HOME is not set"))
}

/// A held deploy lock. Call `release()` when the deploy finishes.
#[derive(Debug)]
pub struct DeployLock {
    path: PathBuf,
    app: AppName,
}

impl DeployLock {
    /// Acquire the lock for `app` in the default state directory.
    pub fn acquire(app: &AppName, force: bool) -> Result<Self, DeployError> {
        Self::acquire_in(&state_dir()?, app, force)
    }

    /// Acquire the lock for `app` in `dir`.
    ///
    /// Uses `create_new` for atomic acquisition (no TOCTOU race).
    /// Returns `LockHeld` if another process holds a fresh lock.
    /// Auto-breaks stale locks (>1 hour) with a warning; `force` breaks any lock.
    pub fn acquire_in(dir: &Path, app: &AppName, force: bool) -> Result<Self, DeployError> {
        fs::create_dir_all(dir).map_err(|e| {
            DeployError::lock_error(format!("failed to create {}: {}", dir.display(), e))
        })?;

        let path = LockInfo::lock_path(dir, app);
        let lock_info = LockInfo::new(app);
        let lock_json = serde_json::to_string(&lock_info)
            .map_err(|e| DeployError::lock_error(format!("failed to serialize lock: {}", e)))?;

        if try_create(&path, &lock_json)? {
            return Ok(Self {
                path,
                app: app.clone(),
            });
        }

        match Self::existing_lock(&path) {
            Some(existing) if !force && !existing.is_stale() => {
                return Err(DeployError::lock_held(
                    existing.holder,
                    existing.pid,
                    existing.started_at,
                ));
            }
            Some(existing) => {
                tracing::warn!(
                    "Breaking {} lock held by {} (pid {}) since {}",
                    if force { "forced" } else { "stale" },
                    existing.holder,
                    existing.pid,
                    existing.started_at
                );
            }
            None => tracing::warn!("Lock info unreadable, breaking lock"),
        }

        tracing::debug!("Removing lock at {}", path.display());
        if let Err(e) = fs::remove_file(&path)
            && e.kind() != ErrorKind::NotFound
        {
            return Err(DeployError::lock_error(format!(
                "failed to break lock {}: {}",
                path.display(),
                e
            )));
        }

        if !try_create(&path, &lock_json)? {
            return Err(DeployError::lock_error(
                "lock acquired by another process during break",
            ));
        }

        Ok(Self {
            path,
            app: app.clone(),
        })
    }

    fn existing_lock(path: &Path) -> Option<LockInfo> {
        let contents = fs::read_to_string(path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    pub fn app(&self) -> &AppName {
        &self.app
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock.
    pub fn release(self) -> Result<(), DeployError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DeployError::lock_error(format!(
                "failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Atomically create `path` with `contents`. Returns false if it already exists.
fn try_create(path: &Path, contents: &str) -> Result<bool, DeployError> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(DeployError::lock_error(format!(
                "failed to create {}: {}",
                path.display(),
                e
            )));
        }
    };

    file.write_all(contents.as_bytes())
        .map_err(|e| DeployError::lock_error(format!("failed to write lock: {}", e)))?;
    Ok(true)
}
