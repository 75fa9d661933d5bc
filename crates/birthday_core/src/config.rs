//! Application configuration (`config.json`).
//!
//! # Responsibility
//! - Load notify time, trigger rules, language and poll cadence.
//! - Substitute documented defaults when the file is missing or broken.
//!
//! # Invariants
//! - Configuration is read once at startup and never reloaded.
//! - Rule keys are priorities `1..=5` written as strings, as in the file.

use crate::model::record::{MAX_PRIORITY, MIN_PRIORITY};
use crate::model::rules::TriggerRuleSet;
use crate::reminder::message::Language;
use crate::schedule::scheduler::DEFAULT_POLL_INTERVAL;
use chrono::NaiveTime;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

/// File name looked up inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";
/// Notify time used when none is configured.
pub const DEFAULT_NOTIFY_TIME: &str = "09:00";
const MAX_POLL_INTERVAL_SECS: u64 = 300;

static NOTIFY_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}(:\d{2})?$").expect("valid notify time regex"));

/// Configuration loading error.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidNotifyTime(String),
    InvalidPriorityKey(String),
    InvalidLanguage(String),
    InvalidPollInterval(u64),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "failed to parse config: {err}"),
            Self::InvalidNotifyTime(value) => {
                write!(f, "notify_time `{value}` must use the HH:MM format")
            }
            Self::InvalidPriorityKey(value) => write!(
                f,
                "remind_rules key `{value}` must be a priority in {MIN_PRIORITY}..={MAX_PRIORITY}"
            ),
            Self::InvalidLanguage(value) => {
                write!(f, "language `{value}` is unsupported; expected zh|en")
            }
            Self::InvalidPollInterval(value) => write!(
                f,
                "poll_interval_secs {value} is out of range; expected 1..={MAX_POLL_INTERVAL_SECS}"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub notify_time: NaiveTime,
    pub rules: TriggerRuleSet,
    pub language: Language,
    pub poll_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            notify_time: parse_notify_time(DEFAULT_NOTIFY_TIME).unwrap_or(NaiveTime::MIN),
            rules: TriggerRuleSet::default(),
            language: Language::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

// On-disk shape; every field is optional so partial files still load.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notify_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remind_rules: Option<BTreeMap<String, Vec<u32>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    poll_interval_secs: Option<u64>,
}

impl AppConfig {
    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults; a present but invalid file is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Loads configuration, falling back to the defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    "event=config_load module=config status=error fallback=defaults path={} error={}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Parses and validates configuration JSON.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        let defaults = Self::default();

        let notify_time = match raw.notify_time.as_deref() {
            Some(value) => parse_notify_time(value)?,
            None => defaults.notify_time,
        };

        let language = match raw.language.as_deref() {
            Some(value) => {
                Language::parse(value).ok_or_else(|| ConfigError::InvalidLanguage(value.into()))?
            }
            None => defaults.language,
        };

        let poll_interval = match raw.poll_interval_secs {
            Some(secs) if (1..=MAX_POLL_INTERVAL_SECS).contains(&secs) => {
                Duration::from_secs(secs)
            }
            Some(secs) => return Err(ConfigError::InvalidPollInterval(secs)),
            None => defaults.poll_interval,
        };

        let mut rules = TriggerRuleSet::new();
        for (key, offsets) in raw.remind_rules.unwrap_or_default() {
            let priority = key
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|priority| (MIN_PRIORITY..=MAX_PRIORITY).contains(priority))
                .ok_or_else(|| ConfigError::InvalidPriorityKey(key.clone()))?;
            rules.set_rule(priority, offsets);
        }

        Ok(Self {
            notify_time,
            rules,
            language,
            poll_interval,
        })
    }

    /// Serializes this configuration in the on-disk shape.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        let raw = RawConfig {
            language: Some(
                match self.language {
                    Language::Zh => "zh",
                    Language::En => "en",
                }
                .to_string(),
            ),
            notify_time: Some(self.notify_time.format("%H:%M").to_string()),
            remind_rules: Some(
                self.rules
                    .iter()
                    .map(|(priority, offsets)| {
                        (priority.to_string(), offsets.iter().copied().collect())
                    })
                    .collect(),
            ),
            poll_interval_secs: Some(self.poll_interval.as_secs()),
        };
        Ok(serde_json::to_string_pretty(&raw)?)
    }

    /// Writes this configuration to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

/// Parses an `HH:MM` (or `HH:MM:SS`) local time of day.
pub fn parse_notify_time(value: &str) -> Result<NaiveTime, ConfigError> {
    let trimmed = value.trim();
    if !NOTIFY_TIME_RE.is_match(trimmed) {
        return Err(ConfigError::InvalidNotifyTime(trimmed.to_string()));
    }
    let format = if trimmed.len() == 5 { "%H:%M" } else { "%H:%M:%S" };
    NaiveTime::parse_from_str(trimmed, format)
        .map_err(|_| ConfigError::InvalidNotifyTime(trimmed.to_string()))
}
