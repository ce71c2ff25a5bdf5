//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/intervals/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub timer: TimerConfig,

    #[serde(default)]
    pub cues: CueConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl DataConfig {
    pub fn presets_path(&self) -> PathBuf {
        presets_path(&self.data_dir)
    }
}

/// Timer driver configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Milliseconds between display refreshes.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

/// Audible cue configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CueConfig {
    /// Ring the terminal bell on step change and completion.
    #[serde(default = "default_bell")]
    pub bell: bool,
}

impl Default for CueConfig {
    fn default() -> Self {
        Self {
            bell: default_bell(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("intervals")
}

fn default_frame_interval_ms() -> u64 {
    100
}

fn default_bell() -> bool {
    true
}

/// Location of the presets file inside a data directory
pub fn presets_path(data_dir: &Path) -> PathBuf {
    data_dir.join("presets.json")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("intervals").join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.timer.frame_interval_ms == 0 {
            return Err(Error::Config(
                "timer.frame_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timer.frame_interval_ms, 100);
        assert!(config.cues.bell);
        assert!(config.data.data_dir.ends_with("intervals"));
        assert!(config.data.presets_path().ends_with("presets.json"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.timer.frame_interval_ms = 250;
        config.cues.bell = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.timer.frame_interval_ms, 250);
        assert!(!loaded.cues.bell);
        assert_eq!(loaded.data.data_dir, config.data.data_dir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[cues]
bell = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(!config.cues.bell);
        assert_eq!(config.timer.frame_interval_ms, 100); // default
    }

    #[test]
    fn test_zero_frame_interval_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nframe_interval_ms = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }
}
