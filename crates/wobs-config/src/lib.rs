use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;
use wobs_core::{FieldPolicy, FieldSpec, PolicyError, ReportHours, ScheduleError};
use wobs_sources::Endpoints;

pub const CONFIG_ENV: &str = "WOBS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "observer.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Local wall-clock times, `HH:MM:SS`
    pub report_hours: Option<Vec<String>>,
    /// Upper bound on one scheduler sleep
    pub max_sleep_secs: Option<u64>,
    /// Wait before trying again when no target could be resolved
    pub retry_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub dir: Option<PathBuf>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetsConfig {
    pub file: Option<PathBuf>,
}

/// Base URL overrides per provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub geocoding: Option<String>,
    pub weatherbit: Option<String>,
    pub elevation: Option<String>,
    pub marine: Option<String>,
    pub geomagnetic: Option<String>,
    pub clock: Option<String>,
    pub ipinfo: Option<String>,
    pub telegram: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub targets: TargetsConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Replaces the built-in Weatherbit field policy when non-empty
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid URL for provider `{provider}`: {source}")]
    Url {
        provider: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid field policy: {0}")]
    Policy(#[from] PolicyError),
    #[error("Invalid schedule: {0}")]
    Schedule(#[from] ScheduleError),
}

impl AppConfig {
    /// Load configuration from the WOBS_CONFIG path (TOML) if present, with reasonable defaults
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    /// Missing file means defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Self::parse(&s)
        } else {
            Ok(AppConfig::default())
        }
    }

    /// Parse and validate
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let cfg = toml::from_str::<AppConfig>(s)?;
        cfg.report_hours()?;
        cfg.field_policy()?;
        cfg.endpoints()?;
        Ok(cfg)
    }

    pub fn report_hours(&self) -> Result<ReportHours, ConfigError> {
        match &self.schedule.report_hours {
            Some(hours) => Ok(ReportHours::parse(hours)?),
            None => Ok(ReportHours::default()),
        }
    }

    /// Default 60s
    pub fn max_sleep(&self) -> Duration {
        Duration::from_secs(self.schedule.max_sleep_secs.unwrap_or(60).max(1))
    }

    /// Default 300s
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.retry_secs.unwrap_or(300).max(1))
    }

    /// Directory of report documents (default: working directory)
    pub fn report_dir(&self) -> PathBuf {
        self.report.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn report_prefix(&self) -> &str {
        self.report.prefix.as_deref().unwrap_or("weather_report")
    }

    /// Target list file (default `cities.txt`)
    pub fn targets_file(&self) -> PathBuf {
        self.targets
            .file
            .clone()
            .unwrap_or_else(|| PathBuf::from("cities.txt"))
    }

    pub fn field_policy(&self) -> Result<FieldPolicy, ConfigError> {
        if self.fields.is_empty() {
            Ok(FieldPolicy::weatherbit())
        } else {
            Ok(FieldPolicy::new(self.fields.clone())?)
        }
    }

    /// Provider base URLs with overrides applied
    pub fn endpoints(&self) -> Result<Endpoints, ConfigError> {
        let mut endpoints = Endpoints::default();
        let p = &self.providers;
        let overrides: [(&'static str, &Option<String>, &mut String); 7] = [
            ("geocoding", &p.geocoding, &mut endpoints.geocoding),
            ("weatherbit", &p.weatherbit, &mut endpoints.weatherbit),
            ("elevation", &p.elevation, &mut endpoints.elevation),
            ("marine", &p.marine, &mut endpoints.marine),
            ("geomagnetic", &p.geomagnetic, &mut endpoints.geomagnetic),
            ("clock", &p.clock, &mut endpoints.clock),
            ("ipinfo", &p.ipinfo, &mut endpoints.ipinfo),
        ];
        for (provider, value, slot) in overrides {
            if let Some(url) = value {
                validate_url(provider, url)?;
                *slot = url.clone();
            }
        }
        if let Some(url) = &p.telegram {
            validate_url("telegram", url)?;
        }
        Ok(endpoints)
    }

    pub fn telegram_url(&self) -> Option<&str> {
        self.providers.telegram.as_deref()
    }
}

fn validate_url(provider: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|source| ConfigError::Url { provider, source })
}
