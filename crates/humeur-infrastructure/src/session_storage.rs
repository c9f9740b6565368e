//! File-backed session token storage.
//!
//! The token lives in a single TOML file (`session.toml`). Writes are atomic
//! (tmp file + fsync + rename) and mutations take an exclusive file lock, so
//! a reader never observes a half-written token and a `store` is fully
//! visible to any subsequent `load`.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use humeur_core::error::{HumeurError, Result};
use humeur_core::session::TokenStore;

use crate::paths::HumeurPaths;

/// On-disk shape of the session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

/// Storage for the session token file.
///
/// Responsibilities:
/// - Persist the single session token across restarts
/// - Read it back on screen mount and before every protected request
/// - Delete it on logout or forced teardown (idempotent)
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    /// Creates a storage handle at the default path
    /// (`~/.config/humeur/session.toml`).
    pub fn new() -> Result<Self> {
        let path = HumeurPaths::session_file()
            .map_err(|e| HumeurError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a storage handle with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the path to the session file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_token(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let session: StoredSession = toml::from_str(&content)?;
        // An empty token is not a session.
        Ok((!session.token.is_empty()).then_some(session.token))
    }

    fn write_token(&self, token: &str) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let session = StoredSession {
            token: token.to_string(),
        };
        let toml_string = toml::to_string_pretty(&session)?;

        // Write to a temporary file in the same directory, then rename.
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!(path = %self.path.display(), "session token written");
        Ok(())
    }

    fn remove_file(&self) -> Result<()> {
        let _lock = FileLock::acquire(&self.path)?;

        if self.path.exists() {
            fs::remove_file(&self.path)?;
            debug!(path = %self.path.display(), "session token cleared");
        }
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| HumeurError::io("session path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| HumeurError::io("session path has no file name"))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

impl TokenStore for SessionStorage {
    fn load(&self) -> Result<Option<String>> {
        self.read_token()
    }

    fn store(&self, token: &str) -> Result<()> {
        self.write_token(token)
    }

    fn clear(&self) -> Result<()> {
        self.remove_file()
    }
}

/// A file lock guard that automatically releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Acquires an exclusive lock next to the given path.
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| HumeurError::io(format!("failed to acquire lock: {e}")))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped.
        let _ = fs::remove_file(&self.lock_path);
    }
}
