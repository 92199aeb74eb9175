//! Application configuration.
//!
//! The data directory is resolved first (explicit path, then the
//! `ACADEMY_DATA_DIR` environment variable, then the platform data directory),
//! and `academy.yaml` inside it is read when present. A `.academy_redirect`
//! file in the default directory points the app at another directory.

use anyhow::{Context, Result};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::activity_feed::ActivityFeedOptions;

pub const DATA_DIR_ENV: &str = "ACADEMY_DATA_DIR";
pub const CONFIG_FILE_NAME: &str = "academy.yaml";
pub const REDIRECT_FILE_NAME: &str = ".academy_redirect";
const DEFAULT_DIRECTORY_NAME: &str = "academy-records";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademyConfig {
    /// Filled in from the resolved directory when not set in the file
    pub data_directory: Option<PathBuf>,
    /// Prefix for store keys; empty means the bare legacy keys
    pub key_namespace: String,
    pub recent_sessions_limit: usize,
    pub recent_tests_limit: usize,
    pub activity_per_collection: usize,
    pub activity_feed_limit: usize,
}

impl Default for AcademyConfig {
    fn default() -> Self {
        Self {
            data_directory: None,
            key_namespace: "academy".to_string(),
            recent_sessions_limit: 9,
            recent_tests_limit: 20,
            activity_per_collection: 3,
            activity_feed_limit: 5,
        }
    }
}

impl AcademyConfig {
    /// Resolve the data directory and load its `academy.yaml`, if any
    pub fn load(explicit_directory: Option<&Path>) -> Result<Self> {
        let directory = resolve_data_directory(explicit_directory)?;
        Self::load_from_directory(&directory)
    }

    pub fn load_from_directory(directory: &Path) -> Result<Self> {
        let config_path = directory.join(CONFIG_FILE_NAME);
        let mut config = if config_path.exists() {
            let yaml_content = fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: AcademyConfig = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?;
            info!("Loaded configuration from {}", config_path.display());
            config
        } else {
            info!("No {} in {}, using defaults", CONFIG_FILE_NAME, directory.display());
            AcademyConfig::default()
        };

        if config.data_directory.is_none() {
            config.data_directory = Some(directory.to_path_buf());
        }
        Ok(config)
    }

    pub fn save_to_directory(&self, directory: &Path) -> Result<()> {
        let yaml_content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;
        let config_path = directory.join(CONFIG_FILE_NAME);
        fs::write(&config_path, yaml_content)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        info!("Saved configuration to {}", config_path.display());
        Ok(())
    }

    /// The directory records are stored in
    pub fn data_directory(&self) -> Result<PathBuf> {
        match &self.data_directory {
            Some(directory) => Ok(directory.clone()),
            None => resolve_data_directory(None),
        }
    }

    pub fn activity_feed_options(&self) -> ActivityFeedOptions {
        ActivityFeedOptions {
            per_collection: self.activity_per_collection,
            limit: self.activity_feed_limit,
        }
    }
}

/// Explicit path, then `ACADEMY_DATA_DIR`, then the platform default
/// (following a redirect file if one is there).
pub fn resolve_data_directory(explicit_directory: Option<&Path>) -> Result<PathBuf> {
    if let Some(directory) = explicit_directory {
        return Ok(directory.to_path_buf());
    }
    if let Ok(directory) = std::env::var(DATA_DIR_ENV) {
        if !directory.trim().is_empty() {
            info!("Using data directory from {}: {}", DATA_DIR_ENV, directory);
            return Ok(PathBuf::from(directory.trim()));
        }
    }
    let default_directory = dirs::data_dir()
        .context("Could not determine the platform data directory")?
        .join(DEFAULT_DIRECTORY_NAME);
    Ok(follow_redirect(&default_directory))
}

/// The directory a `.academy_redirect` file in `default_directory` points to,
/// or `default_directory` itself when there is no usable redirect.
pub fn follow_redirect(default_directory: &Path) -> PathBuf {
    let redirect_file = default_directory.join(REDIRECT_FILE_NAME);
    if !redirect_file.exists() {
        info!("No redirect file found, using data directory: {}", default_directory.display());
        return default_directory.to_path_buf();
    }

    match fs::read_to_string(&redirect_file) {
        Ok(redirected_path) => {
            let path = PathBuf::from(redirected_path.trim());
            if path.is_dir() {
                info!("Found redirect file, using data directory: {}", path.display());
                path
            } else {
                warn!(
                    "Redirect file points to non-existent directory: {}. Using default.",
                    path.display()
                );
                default_directory.to_path_buf()
            }
        }
        Err(e) => {
            error!("Failed to read redirect file: {}. Using default directory.", e);
            default_directory.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AcademyConfig::default();
        assert_eq!(config.key_namespace, "academy");
        assert_eq!(config.recent_sessions_limit, 9);
        assert_eq!(config.recent_tests_limit, 20);
        assert_eq!(config.activity_feed_options(), ActivityFeedOptions::default());
    }

    #[test]
    fn test_missing_file_uses_defaults_with_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = AcademyConfig::load(Some(temp_dir.path())).unwrap();
        assert_eq!(config.data_directory.as_deref(), Some(temp_dir.path()));
        assert_eq!(config.activity_feed_limit, 5);
    }

    #[test]
    fn test_partial_yaml_fills_in_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "key_namespace: ''\nrecent_tests_limit: 50\n",
        )
        .unwrap();

        let config = AcademyConfig::load_from_directory(temp_dir.path()).unwrap();
        assert_eq!(config.key_namespace, "");
        assert_eq!(config.recent_tests_limit, 50);
        assert_eq!(config.recent_sessions_limit, 9);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "recent_tests_limit: [oops").unwrap();
        assert!(AcademyConfig::load_from_directory(temp_dir.path()).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let config = AcademyConfig {
            activity_feed_limit: 8,
            ..AcademyConfig::default()
        };
        config.save_to_directory(temp_dir.path()).unwrap();

        let loaded = AcademyConfig::load_from_directory(temp_dir.path()).unwrap();
        assert_eq!(loaded.activity_feed_limit, 8);
    }

    #[test]
    fn test_follow_redirect() {
        let default_dir = TempDir::new().unwrap();
        let target_dir = TempDir::new().unwrap();
        assert_eq!(follow_redirect(default_dir.path()), default_dir.path());

        fs::write(
            default_dir.path().join(REDIRECT_FILE_NAME),
            format!("{}\n", target_dir.path().display()),
        )
        .unwrap();
        assert_eq!(follow_redirect(default_dir.path()), target_dir.path());

        fs::write(default_dir.path().join(REDIRECT_FILE_NAME), "/no/such/academy/dir").unwrap();
        assert_eq!(follow_redirect(default_dir.path()), default_dir.path());
    }
}
