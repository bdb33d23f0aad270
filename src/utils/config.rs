use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::CertError;

pub const DATABASE_ENV: &str = "REVCERT_DATABASE";
pub const DEFAULT_DATABASE: &str = "certificate.db";

/// Process-wide settings, bound once at startup and handed to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path of the SQLite database holding applicant and government records
    pub database: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}

impl Config {
    /// Resolve configuration: explicit file first, then the environment, then defaults.
    pub fn load(config_file: Option<&Path>) -> Result<Self, CertError> {
        Self::resolve(config_file, std::env::var(DATABASE_ENV).ok())
    }

    pub fn resolve(
        config_file: Option<&Path>,
        database_env: Option<String>,
    ) -> Result<Self, CertError> {
        if let Some(path) = config_file {
            return Self::from_file(path);
        }

        match database_env {
            Some(database) if !database.trim().is_empty() => Ok(Config {
                database: PathBuf::from(database),
            }),
            _ => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, CertError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CertError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        if config.database.as_os_str().is_empty() {
            return Err(CertError::Config(format!(
                "{}: database path is empty",
                path.display()
            )));
        }
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
