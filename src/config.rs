use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogConfig;
use crate::track::ElevationPolicy;
use crate::units::UnitSystem;

/// Main application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Display and track settings
    #[serde(default)]
    pub settings: AppSettings,

    /// Personal defaults used when a command omits them
    #[serde(default)]
    pub athlete: AthleteDefaults,

    /// Logging setup
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Units used for display and for interpreting user input
    pub units: UnitSystem,

    /// How trackpoints without elevation count toward gain/loss
    pub elevation_policy: ElevationPolicy,
}

/// Athlete defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AthleteDefaults {
    /// Threshold pace in min/km
    pub threshold_pace: Option<Decimal>,

    /// Typical effort points per hour on race day
    pub eph: Option<Decimal>,

    /// Climbing ability, 1.0 = average
    pub climbing_factor: Decimal,

    /// Descending ability, 1.0 = average
    pub descending_factor: Decimal,
}

impl Default for AthleteDefaults {
    fn default() -> Self {
        Self {
            threshold_pace: None,
            eph: None,
            climbing_factor: dec!(1),
            descending_factor: dec!(1),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            athlete: AthleteDefaults::default(),
            logging: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Write a default config to `path`, or to the default location, unless a
    /// file is already there. Returns the path and whether it was created.
    pub fn init_file(path: Option<&Path>) -> Result<(PathBuf, bool)> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if config_path.exists() {
            return Ok((config_path, false));
        }

        Self::default().save_to_file(&config_path)?;
        tracing::info!(path = %config_path.display(), "Wrote default config");
        Ok((config_path, true))
    }

    /// Default configuration file path, `~/.trailsync/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".trailsync")
            .join("config.toml")
    }

    /// Load `path`, or the default location, falling back to defaults when absent
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_config_path);

        if !config_path.exists() {
            // An explicit path that does not exist is a mistake, the default one is not
            if path.is_some() {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_from_file(&config_path)
    }

    /// Reject values no calculator accepts
    pub fn validate(&self) -> Result<()> {
        if let Some(pace) = self.athlete.threshold_pace {
            if pace <= dec!(0) {
                anyhow::bail!("athlete.threshold_pace must be positive, got {}", pace);
            }
        }
        if let Some(eph) = self.athlete.eph {
            if eph <= dec!(0) {
                anyhow::bail!("athlete.eph must be positive, got {}", eph);
            }
        }
        if self.athlete.climbing_factor <= dec!(0) || self.athlete.descending_factor <= dec!(0) {
            anyhow::bail!("athlete climbing/descending factors must be positive");
        }
        Ok(())
    }
}
