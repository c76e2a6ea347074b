//! Configuration management
//!
//! This module handles loading the s3cm configuration file. The configuration is
//! stored in TOML format at ~/.config/s3cm/config.toml unless another path is given.
//! A path ending in `.properties` is read as a legacy credentials file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::credentials::Credentials;
use crate::error::{Error, Result};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Default color setting
const DEFAULT_COLOR: &str = "auto";

/// Extension that selects the legacy properties format
const PROPERTIES_EXTENSION: &str = "properties";

/// Written on first run so the operator has something to fill in
const CONFIG_TEMPLATE: &str = r#"# s3cm configuration
schema_version = 1

[credentials]
access_key = ""
secret_key = ""
region = "us-east-1"
# endpoint = "http://localhost:9000"
bucket_lookup = "auto"

[defaults]
color = "auto"
progress = true
"#;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Storage credentials
    pub credentials: Credentials,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,
}

/// Default settings for CLI behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Color mode: "auto", "always", or "never"
    #[serde(default = "default_color")]
    pub color: String,

    /// Show progress spinners
    #[serde(default = "default_true")]
    pub progress: bool,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            color: default_color(),
            progress: true,
        }
    }
}

impl Config {
    /// Configuration holding only credentials, with default settings
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            credentials,
            defaults: Defaults::default(),
        }
    }
}

/// Configuration manager handles locating and loading config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        let config_path = config_dir.join("s3cm").join("config.toml");
        Ok(Self { config_path })
    }

    /// Create a ConfigManager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn is_properties(&self) -> bool {
        self.config_path
            .extension()
            .is_some_and(|ext| ext == PROPERTIES_EXTENSION)
    }

    /// Load and validate configuration from disk
    ///
    /// A missing file is a credentials error: nothing can be done without keys.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Err(Error::Credentials(format!(
                "no configuration file at {}",
                self.config_path.display()
            )));
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config = if self.is_properties() {
            Config::with_credentials(Credentials::from_properties(&content)?)
        } else {
            toml::from_str::<Config>(&content)?
        };

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade s3cm.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        config.credentials.validate()?;
        tracing::debug!(path = %self.config_path.display(), "configuration loaded");
        Ok(config)
    }

    /// Write a configuration template if no file exists yet
    ///
    /// Returns true when a template was written. Properties paths are left alone.
    /// Sets file permissions to 600 (owner read/write only).
    pub fn write_template(&self) -> Result<bool> {
        if self.config_path.exists() || self.is_properties() {
            return Ok(false);
        }

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, CONFIG_TEMPLATE)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(true)
    }
}
