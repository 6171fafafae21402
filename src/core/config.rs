use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_DAYS: i64 = 30;

pub const ENV_DAYS: &str = "COST_TRACKER_DAYS";
pub const ENV_SLACK_WEBHOOK_URL: &str = "COST_TRACKER_SLACK_WEBHOOK_URL";
pub const ENV_LOG_FORMAT: &str = "COST_TRACKER_LOG_FORMAT";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },
    #[error("Invalid log format: '{0}' (must be 'text' or 'json')")]
    InvalidLogFormat(String),
    #[error("Failed to write config to {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub days: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotifySection {
    pub slack_webhook_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSection {
    pub format: Option<LogFormat>,
}

/// Contents of the optional config file. Every value is optional so that
/// absent keys fall through to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub notify: NotifySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("cost-tracker").join("config.toml")
    }

    /// Load config from `path`, falling back to defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Config written by `config init`: defaults spelled out, webhook left unset.
    pub fn template() -> Self {
        Self {
            report: ReportSection {
                days: Some(DEFAULT_DAYS),
            },
            notify: NotifySection::default(),
            logging: LoggingSection {
                format: Some(LogFormat::Text),
            },
        }
    }

    /// Serialize and write this config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(write_error)?;
        Ok(())
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if let Some(days) = self.report.days {
            if days <= 0 {
                issues.push(format!("Invalid report.days: {} (must be positive)", days));
            }
        }
        if let Some(url) = &self.notify.slack_webhook_url {
            if !url.starts_with("https://") {
                issues.push(format!(
                    "Invalid notify.slack_webhook_url: '{}' (must use https://)",
                    url
                ));
            }
        }
        issues
    }
}

/// First present value wins: flag, then environment, then file, then default.
pub fn resolve<T>(flag: Option<T>, env: Option<T>, file: Option<T>, default: T) -> T {
    flag.or(env).or(file).unwrap_or(default)
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub days: Option<i64>,
    pub slack_webhook_url: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub days: i64,
    pub slack_webhook_url: Option<String>,
    pub log_format: LogFormat,
}

impl Settings {
    /// Merge flags, environment (looked up through `env`) and file values.
    pub fn resolve<F>(flags: &Overrides, env: F, file: &AppConfig) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_days = env_value(&env, ENV_DAYS, |v| v.trim().parse::<i64>().ok())?;
        let env_webhook = env(ENV_SLACK_WEBHOOK_URL).filter(|v| !v.is_empty());
        let env_log_format = env_value(&env, ENV_LOG_FORMAT, |v| v.parse::<LogFormat>().ok())?;

        Ok(Self {
            days: resolve(flags.days, env_days, file.report.days, DEFAULT_DAYS),
            slack_webhook_url: resolve(
                flags.slack_webhook_url.clone().map(Some),
                env_webhook.map(Some),
                file.notify.slack_webhook_url.clone().map(Some),
                None,
            ),
            log_format: resolve(
                flags.log_format,
                env_log_format,
                file.logging.format,
                LogFormat::default(),
            ),
        })
    }

    /// Resolve against the process environment.
    pub fn from_env(flags: &Overrides, file: &AppConfig) -> Result<Self, ConfigError> {
        Self::resolve(flags, |name| std::env::var(name).ok(), file)
    }
}

/// Webhook for reporting failures that happen before [`Settings`] exist.
/// Uses whatever sources are still readable, in the usual precedence.
pub fn webhook_fallback<F>(flag: Option<String>, env: F, file: Option<&AppConfig>) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    let env_webhook = env(ENV_SLACK_WEBHOOK_URL).filter(|v| !v.is_empty());
    let file_webhook = file.and_then(|f| f.notify.slack_webhook_url.clone());
    resolve(flag.map(Some), env_webhook.map(Some), file_webhook.map(Some), None)
}

fn env_value<T, F, P>(env: &F, name: &'static str, parse: P) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    match env(name) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse(&value)
            .map(Some)
            .ok_or(ConfigError::InvalidEnv { name, value }),
    }
}
