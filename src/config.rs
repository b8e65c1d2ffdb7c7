//! Configuration Management
//!
//! Handles persistent configuration storage for cwfilter.

use crate::aws::auth;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// AWS region
    #[serde(default)]
    pub region: Option<String>,
    /// Credentials profile
    #[serde(default)]
    pub profile: Option<String>,
    /// Endpoint override (local emulators)
    #[serde(default)]
    pub endpoint: Option<String>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cwfilter").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective profile (CLI > config > AWS_PROFILE > default)
    pub fn effective_profile(&self) -> String {
        self.profile
            .clone()
            .or_else(auth::get_default_profile)
            .unwrap_or_else(|| auth::DEFAULT_PROFILE.to_string())
    }

    /// Get effective region (CLI > config > environment/shared config > us-east-1)
    pub fn effective_region(&self, profile: &str) -> String {
        self.region
            .clone()
            .or_else(|| auth::get_default_region(profile))
            .unwrap_or_else(|| auth::DEFAULT_REGION.to_string())
    }
}
