//! Client configuration file storage.
//!
//! Loads `config.toml` from the humeur config directory and writes a template
//! on first run. The only knob today is the backend base address, resolved
//! with the precedence: CLI flag > `HUMEUR_API_URL` > config file > default.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use humeur_core::error::{HumeurError, Result};

use crate::paths::HumeurPaths;

/// Default backend address, matching the development setup of the service.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Name of the environment variable overriding the backend address.
pub const API_URL_ENV: &str = "HUMEUR_API_URL";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base address of the sentiment backend, without a trailing slash.
    pub api_base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Resolves the effective configuration from the file contents and the
    /// two override channels. Trailing slashes are stripped so endpoint
    /// paths can be joined with a plain `/`.
    pub fn resolve(
        file: Option<ClientConfig>,
        env_url: Option<String>,
        cli_url: Option<String>,
    ) -> Self {
        let api_base_url = cli_url
            .or(env_url)
            .or(file.map(|c| c.api_base_url))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Storage for the client configuration file (config.toml).
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a storage handle at the default path
    /// (`~/.config/humeur/config.toml`).
    pub fn new() -> Result<Self> {
        let path = HumeurPaths::config_file()
            .map_err(|e| HumeurError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a storage handle with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration file if it exists.
    pub fn load(&self) -> Result<Option<ClientConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let config: ClientConfig = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Loads the configuration, writing a default template on first run.
    pub fn load_or_init(&self) -> Result<ClientConfig> {
        if let Some(config) = self.load()? {
            return Ok(config);
        }

        let config = ClientConfig::default();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let template = format!(
            "# humeur client configuration\n\n{}",
            toml::to_string_pretty(&config)?
        );
        fs::write(&self.path, template)?;
        debug!(path = %self.path.display(), "wrote default config template");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_absent_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ConfigStorage::with_path(temp_dir.path().join("config.toml"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_load_or_init_writes_template() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let storage = ConfigStorage::with_path(path.clone());

        let config = storage.load_or_init().unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(path.exists());

        // A second load round-trips the template.
        assert_eq!(storage.load().unwrap(), Some(config));
    }

    #[test]
    fn test_load_existing_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "api_base_url = \"https://api.example.com\"\n").unwrap();

        let storage = ConfigStorage::with_path(path);
        let config = storage.load().unwrap().unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
    }

    #[test]
    fn test_resolve_precedence() {
        let file = Some(ClientConfig {
            api_base_url: "http://from-file".to_string(),
        });

        let resolved = ClientConfig::resolve(
            file.clone(),
            Some("http://from-env".to_string()),
            Some("http://from-cli".to_string()),
        );
        assert_eq!(resolved.api_base_url, "http://from-cli");

        let resolved =
            ClientConfig::resolve(file.clone(), Some("http://from-env".to_string()), None);
        assert_eq!(resolved.api_base_url, "http://from-env");

        let resolved = ClientConfig::resolve(file, None, None);
        assert_eq!(resolved.api_base_url, "http://from-file");

        let resolved = ClientConfig::resolve(None, None, None);
        assert_eq!(resolved.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_resolve_strips_trailing_slash() {
        let resolved =
            ClientConfig::resolve(None, Some("http://localhost:8000/".to_string()), None);
        assert_eq!(resolved.api_base_url, "http://localhost:8000");
    }
}
