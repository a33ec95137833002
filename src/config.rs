use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use tracing_subscriber::EnvFilter;

use crate::engine::calendar::parse_date;
use crate::engine::study_plan::DEFAULT_READINESS_TARGET;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_readiness_target")]
    pub readiness_target: f64,
    #[serde(default = "default_weak_mastery_threshold")]
    pub weak_mastery_threshold: f64,
    #[serde(default = "default_question_pool_size")]
    pub question_pool_size: u32,
    #[serde(
        default,
        deserialize_with = "deserialize_test_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub test_date: Option<NaiveDate>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_readiness_target() -> f64 {
    DEFAULT_READINESS_TARGET
}
fn default_weak_mastery_threshold() -> f64 {
    50.0
}
fn default_question_pool_size() -> u32 {
    128
}
fn default_log_level() -> String {
    "warn".to_string()
}

/// Accept both `test_date = "2026-12-01"` and a bare TOML date `test_date = 2026-12-01`.
fn deserialize_test_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match toml::Value::deserialize(deserializer)? {
        toml::Value::String(s) => parse_date(&s).map(Some).map_err(de::Error::custom),
        toml::Value::Datetime(dt) => match (dt.date, dt.time, dt.offset) {
            (Some(date), None, None) => {
                NaiveDate::from_ymd_opt(date.year as i32, date.month as u32, date.day as u32)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid test_date {dt}")))
            }
            _ => Err(de::Error::custom(format!(
                "test_date must be a date without a time, got {dt}"
            ))),
        },
        other => Err(de::Error::custom(format!(
            "test_date must be a YYYY-MM-DD date, got {}",
            other.type_str()
        ))),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            readiness_target: default_readiness_target(),
            weak_mastery_threshold: default_weak_mastery_threshold(),
            question_pool_size: default_question_pool_size(),
            test_date: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("civicprep")
            .join("config.toml")
    }

    /// Pull hand-edited values back into range. Call after deserialization.
    pub fn validate(&mut self) {
        if !self.readiness_target.is_finite() {
            self.readiness_target = default_readiness_target();
        }
        self.readiness_target = self.readiness_target.clamp(1.0, 100.0);

        if !self.weak_mastery_threshold.is_finite() {
            self.weak_mastery_threshold = default_weak_mastery_threshold();
        }
        self.weak_mastery_threshold = self.weak_mastery_threshold.clamp(0.0, 100.0);

        self.question_pool_size = self.question_pool_size.max(1);

        if EnvFilter::try_new(&self.log_level).is_err() {
            self.log_level = default_log_level();
        }
    }
}
