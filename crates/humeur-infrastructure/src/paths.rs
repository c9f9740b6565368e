//! Unified path management for humeur configuration files.
//!
//! All humeur configuration and session data live under the platform config
//! directory (e.g. `~/.config/humeur/` on Linux), resolved through the `dirs`
//! crate so the layout is consistent across platforms.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for humeur.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/humeur/            # Config directory
/// ├── config.toml              # Client configuration (backend address)
/// ├── session.toml             # Stored session token
/// └── logs/                    # Application logs
/// ```
pub struct HumeurPaths;

impl HumeurPaths {
    /// Returns the humeur configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/humeur/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("humeur"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the stored session file.
    ///
    /// # Security Note
    ///
    /// The session file holds the bearer token; it is written with 600
    /// permissions on Unix.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.toml"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = HumeurPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("humeur"));
    }

    #[test]
    fn test_config_file() {
        let config_file = HumeurPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        let config_dir = HumeurPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_session_file() {
        let session_file = HumeurPaths::session_file().unwrap();
        assert!(session_file.ends_with("session.toml"));
        let config_dir = HumeurPaths::config_dir().unwrap();
        assert!(session_file.starts_with(&config_dir));
    }

    #[test]
    fn test_logs_dir() {
        let logs_dir = HumeurPaths::logs_dir().unwrap();
        assert!(logs_dir.ends_with("logs"));
    }
}
