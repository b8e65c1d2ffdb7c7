//! AWS Credentials
//!
//! Resolves access keys from environment variables or the shared credentials
//! file, and the default region from the environment or the shared config file.

use anyhow::{anyhow, Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Static access key credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

// Keep secrets out of logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key_id: &str, secret_access_key: &str, session_token: Option<&str>) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            secret_access_key: secret_access_key.to_string(),
            session_token: session_token.map(str::to_string),
        }
    }

    /// Resolve credentials: environment first, then the shared credentials file
    pub fn load(profile: &str) -> Result<Self> {
        if let Some(creds) = Self::from_env() {
            tracing::debug!("Using credentials from environment");
            return Ok(creds);
        }

        let path = shared_credentials_path()
            .ok_or_else(|| anyhow!("Could not determine the shared credentials file location"))?;

        Self::from_shared_file(&path, profile).with_context(|| {
            format!(
                "No AWS credentials found. Set AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY or add a [{}] profile to {}",
                profile,
                path.display()
            )
        })
    }

    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`
    pub fn from_env() -> Option<Self> {
        let access_key_id = non_empty_env("AWS_ACCESS_KEY_ID")?;
        let secret_access_key = non_empty_env("AWS_SECRET_ACCESS_KEY")?;
        let session_token = non_empty_env("AWS_SESSION_TOKEN");

        Some(Self {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }

    /// Read a profile from an INI-style credentials file
    pub fn from_shared_file(path: &Path, profile: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_shared_content(&content, profile)
    }

    fn from_shared_content(content: &str, profile: &str) -> Result<Self> {
        let access_key_id = ini_value(content, profile, "aws_access_key_id")
            .ok_or_else(|| anyhow!("Profile [{}] has no aws_access_key_id", profile))?;
        let secret_access_key = ini_value(content, profile, "aws_secret_access_key")
            .ok_or_else(|| anyhow!("Profile [{}] has no aws_secret_access_key", profile))?;
        let session_token = ini_value(content, profile, "aws_session_token");

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Shared credentials file (`AWS_SHARED_CREDENTIALS_FILE` or `~/.aws/credentials`)
pub fn shared_credentials_path() -> Option<PathBuf> {
    if let Some(path) = non_empty_env("AWS_SHARED_CREDENTIALS_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|p| p.join(".aws").join("credentials"))
}

/// Shared config file (`AWS_CONFIG_FILE` or `~/.aws/config`)
pub fn shared_config_path() -> Option<PathBuf> {
    if let Some(path) = non_empty_env("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|p| p.join(".aws").join("config"))
}

/// Profile selected by `AWS_PROFILE`
pub fn get_default_profile() -> Option<String> {
    non_empty_env("AWS_PROFILE")
}

/// Default region from the environment or the shared config file
pub fn get_default_region(profile: &str) -> Option<String> {
    for key in ["AWS_REGION", "AWS_DEFAULT_REGION"] {
        if let Some(region) = non_empty_env(key) {
            if validate_region(&region) {
                return Some(region);
            }
            tracing::warn!("Invalid region format in {}", key);
        }
    }

    let content = std::fs::read_to_string(shared_config_path()?).ok()?;

    // The config file names non-default sections "profile <name>"
    let section = if profile == DEFAULT_PROFILE {
        DEFAULT_PROFILE.to_string()
    } else {
        format!("profile {}", profile)
    };

    ini_value(&content, &section, "region").filter(|r| validate_region(r))
}

/// Region names are lowercase letters, digits and hyphens, e.g. `eu-west-1`
fn validate_region(region: &str) -> bool {
    !region.is_empty()
        && region.len() <= 32
        && region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Look up `key` inside `[section]` of an INI document
fn ini_value(content: &str, section: &str, key: &str) -> Option<String> {
    let mut in_section = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = line[1..line.len() - 1].trim() == section;
        } else if in_section {
            if let Some((k, v)) = line.split_once('=') {
                if k.trim() == key {
                    return Some(v.trim().to_string());
                }
            }
        }
    }

    None
}
