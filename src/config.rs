//! Tool configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`STRATA_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;

use strata_core::EngineTarget;

/// Main tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrataConfig {
    /// Asset lookup configuration
    #[serde(default)]
    pub assets: AssetConfig,
    /// Document handling configuration
    #[serde(default)]
    pub documents: DocumentConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for StrataConfig {
    fn default() -> Self {
        Self {
            assets: AssetConfig::default(),
            documents: DocumentConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl StrataConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`STRATA_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        // Load default config (required)
        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // STRATA_ASSETS__SKELETON_DIR=/data/skel -> assets.skeleton_dir
        figment = figment.merge(Env::prefixed("STRATA_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Asset lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Directory holding reference skeleton files
    pub skeleton_dir: String,
    /// Engine target new documents are created for
    pub default_target: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            skeleton_dir: "assets/skeletons".to_string(),
            default_target: "V130".to_string(),
        }
    }
}

impl AssetConfig {
    /// The configured default target, parsed
    pub fn default_target(&self) -> Result<EngineTarget, ConfigError> {
        self.default_target
            .parse()
            .map_err(|err: strata_core::UnknownTargetError| ConfigError {
                message: err.to_string(),
            })
    }
}

/// Document handling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Attach a message log to documents opened by tools
    pub capture_messages: bool,
    /// Name given to shapes created without one
    pub default_shape_name: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            capture_messages: true,
            default_shape_name: "Shape".to_string(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StrataConfig::default();
        assert_eq!(config.assets.skeleton_dir, "assets/skeletons");
        assert_eq!(
            config.assets.default_target().unwrap(),
            EngineTarget::V130
        );
        assert!(config.documents.capture_messages);
    }

    #[test]
    fn test_config_serialization() {
        let config = StrataConfig::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("skeleton_dir"));
        assert!(toml.contains("log_level"));
    }

    #[test]
    fn test_bad_target_is_an_error() {
        let mut config = StrataConfig::default();
        config.assets.default_target = "V999".to_string();
        let err = config.assets.default_target().unwrap_err();
        assert!(err.to_string().contains("V999"), "got: {}", err);
    }
}
