use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub memory: MemorySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "data/schemes.json".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub min_score: Option<u8>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_age_weight")]
    pub age: u32,
    #[serde(default = "default_gender_weight")]
    pub gender: u32,
    #[serde(default = "default_state_weight")]
    pub state: u32,
    #[serde(default = "default_category_weight")]
    pub category: u32,
    #[serde(default = "default_income_weight")]
    pub income: u32,
    #[serde(default = "default_occupation_weight")]
    pub occupation: u32,
    #[serde(default = "default_special_weight")]
    pub special: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            age: default_age_weight(),
            gender: default_gender_weight(),
            state: default_state_weight(),
            category: default_category_weight(),
            income: default_income_weight(),
            occupation: default_occupation_weight(),
            special: default_special_weight(),
        }
    }
}

fn default_age_weight() -> u32 { 15 }
fn default_gender_weight() -> u32 { 15 }
fn default_state_weight() -> u32 { 20 }
fn default_category_weight() -> u32 { 15 }
fn default_income_weight() -> u32 { 15 }
fn default_occupation_weight() -> u32 { 10 }
fn default_special_weight() -> u32 { 10 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemorySettings {
    pub max_sessions: Option<usize>,
    pub max_history: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with SAARTHI_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Add default config file
            .add_source(File::with_name("config/default").required(false))
            // Add local config file (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables (prefixed with SAARTHI_)
            // e.g., SAARTHI_SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SAARTHI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SAARTHI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.age, 15);
        assert_eq!(weights.gender, 15);
        assert_eq!(weights.state, 20);
        assert_eq!(weights.category, 15);
        assert_eq!(weights.income, 15);
        assert_eq!(weights.occupation, 10);
        assert_eq!(weights.special, 10);
    }

    #[test]
    fn test_default_server() {
        let server = ServerSettings::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_settings_default_is_complete() {
        let settings = Settings::default();
        assert_eq!(settings.catalog.path, "data/schemes.json");
        assert!(settings.matching.min_score.is_none());
        assert!(settings.memory.max_sessions.is_none());
    }
}
