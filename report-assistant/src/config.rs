// Application configuration
//
// Layered with the `config` crate: built-in defaults, then an optional TOML file, then
// `REPORT_ASSISTANT_*` environment variables.

use config::{Config, Environment, File, FileFormat};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_PREFIX: &str = "REPORT_ASSISTANT";
pub const CONFIG_FILE_NAME: &str = "report-assistant.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid log level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLogLevel(String),
    #[error("auth_max_retries must be at least 1")]
    InvalidRetries,
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    pub log_level: String,
    /// Fixed seed for the mock preview rows; random when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mock_seed: Option<u64>,
    pub login_delay_ms: u64,
    pub auth_timeout_ms: u64,
    pub auth_max_retries: u32,
    pub submit_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_level: "debug".to_string(),
            mock_seed: None,
            login_delay_ms: 1000,
            auth_timeout_ms: 5000,
            auth_max_retries: 3,
            submit_delay_ms: 300,
        }
    }
}

impl AppConfig {
    /// Load from `explicit` (must exist) or the per-user config file (optional), then the
    /// process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(explicit, None)
    }

    /// Same as [`AppConfig::load`] with an injectable environment (`None` reads the process
    /// environment).
    pub fn load_from(
        explicit: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match explicit {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(
                        File::from(path)
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let cfg: AppConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level_filter()?;
        if self.auth_max_retries == 0 {
            return Err(ConfigError::InvalidRetries);
        }
        Ok(())
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_millis(self.auth_timeout_ms)
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// `<platform config dir>/report-assistant/report-assistant.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("report-assistant").join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> Option<config::Map<String, String>> {
        Some(config::Map::new())
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config("log_level = \"info\"\nmock_seed = 42\nlogin_delay_ms = 10\n");
        let cfg = AppConfig::load_from(Some(file.path()), no_env()).unwrap();

        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.mock_seed, Some(42));
        assert_eq!(cfg.login_delay(), Duration::from_millis(10));
        assert_eq!(cfg.auth_max_retries, 3, "unset keys keep defaults");
        assert_eq!(cfg.log_level_filter().unwrap(), LevelFilter::Info);
    }

    #[test]
    fn environment_overrides_file() {
        let file = write_config("log_level = \"info\"\nsubmit_delay_ms = 5\n");
        let mut env = config::Map::new();
        env.insert("REPORT_ASSISTANT_LOG_LEVEL".to_string(), "warn".to_string());
        env.insert("REPORT_ASSISTANT_AUTH_MAX_RETRIES".to_string(), "5".to_string());

        let cfg = AppConfig::load_from(Some(file.path()), Some(env)).unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.auth_max_retries, 5);
        assert_eq!(cfg.submit_delay_ms, 5);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            AppConfig::load_from(Some(&missing), no_env()),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_config("log_level = \"chatty\"\n");
        assert!(matches!(
            AppConfig::load_from(Some(file.path()), no_env()),
            Err(ConfigError::InvalidLogLevel(level)) if level == "chatty"
        ));

        let file = write_config("auth_max_retries = 0\n");
        assert!(matches!(
            AppConfig::load_from(Some(file.path()), no_env()),
            Err(ConfigError::InvalidRetries)
        ));
    }

    #[test]
    fn toml_output_loads_back() {
        let cfg = AppConfig {
            mock_seed: Some(7),
            log_dir: Some(PathBuf::from("/tmp/ra-logs")),
            ..AppConfig::default()
        };
        let file = write_config(&cfg.to_toml().unwrap());
        assert_eq!(AppConfig::load_from(Some(file.path()), no_env()).unwrap(), cfg);

        let text = AppConfig::default().to_toml().unwrap();
        assert!(!text.contains("mock_seed"));
    }
}
