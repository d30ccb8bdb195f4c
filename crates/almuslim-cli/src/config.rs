//! User configuration file support.
//!
//! The configuration is a flat TOML table. Updates are merged into the
//! existing file so keys written by other versions survive.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use almuslim::{CalculationConfig, CalculationMethod, GeoLocation, HighLatitudeRule, Madhab};
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::timezone;

/// Environment variable overriding the configuration path.
pub const CONFIG_ENV: &str = "ALMUSLIM_CONFIG";

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ar" | "arabic" | "العربية" => Language::Ar,
            _ => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    pub fn is_rtl(&self) -> bool {
        *self == Language::Ar
    }
}

/// Persisted user settings. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub madhab: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_latitude_rule: Option<String>,
    #[serde(
        rename = "24h",
        default,
        deserialize_with = "flexible_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub use_24h: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<String>,
    #[serde(default, deserialize_with = "flexible_string", skip_serializing_if = "Option::is_none")]
    pub fg: Option<String>,
    #[serde(default, deserialize_with = "flexible_string", skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool", skip_serializing_if = "Option::is_none")]
    pub ask_on_start: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hijri_adjustment: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Bool(b) => Some(b),
        Scalar::Int(i) => Some(i != 0),
        Scalar::Float(f) => Some(f != 0.0),
        Scalar::Str(s) => Some(matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "y" | "on"
        )),
    })
}

fn flexible_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Some(match Scalar::deserialize(deserializer)? {
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Str(s) => s,
    }))
}

impl UserConfig {
    /// Parses TOML text.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid configuration file")
    }

    /// Coordinates when both latitude and longitude are set and valid.
    pub fn location(&self) -> Option<GeoLocation> {
        let loc = GeoLocation::new(self.latitude?, self.longitude?).ok()?;
        Some(match self.elevation_m {
            Some(m) => loc.with_elevation(m),
            None => loc,
        })
    }

    pub fn method(&self) -> CalculationMethod {
        self.method
            .as_deref()
            .map_or(CalculationMethod::UmmAlQura, CalculationMethod::from_name_lossy)
    }

    pub fn madhab(&self) -> Madhab {
        self.madhab.as_deref().map_or(Madhab::Shafi, Madhab::from_name_lossy)
    }

    pub fn high_latitude_rule(&self) -> Option<HighLatitudeRule> {
        let Some(name) = self.high_latitude_rule.as_deref() else {
            return Some(HighLatitudeRule::MiddleOfTheNight);
        };
        HighLatitudeRule::parse_optional(name).unwrap_or_else(|e| {
            tracing::warn!(%e, "using middle_of_the_night");
            Some(HighLatitudeRule::MiddleOfTheNight)
        })
    }

    pub fn use_24h(&self) -> bool {
        self.use_24h.unwrap_or(true)
    }

    pub fn language(&self) -> Language {
        self.language.as_deref().map_or(Language::En, Language::from_name)
    }

    pub fn ask_on_start(&self) -> bool {
        self.ask_on_start.unwrap_or(false)
    }

    pub fn hijri_adjustment(&self) -> i64 {
        self.hijri_adjustment.unwrap_or(0)
    }

    /// UTC offset of the configured timezone on `date`.
    pub fn utc_offset_on(&self, date: NaiveDate) -> Option<f64> {
        let tz = self.timezone.as_deref().filter(|t| !t.trim().is_empty())?;
        let offset = timezone::resolve_offset(tz, date);
        if offset.is_none() {
            tracing::warn!(timezone = tz, "unrecognized timezone, using system offset");
        }
        offset
    }

    /// Engine configuration for `date`.
    pub fn calculation_config(&self, date: NaiveDate) -> CalculationConfig {
        let config = CalculationConfig::new()
            .method(self.method())
            .madhab(self.madhab())
            .high_latitude_rule(self.high_latitude_rule());
        match self.utc_offset_on(date) {
            Some(offset) => config.utc_offset(offset),
            None => config,
        }
    }
}

fn to_table(config: &UserConfig) -> anyhow::Result<toml::Table> {
    match toml::Value::try_from(config)? {
        toml::Value::Table(table) => Ok(table),
        other => anyhow::bail!("configuration serialized to {}", other.type_str()),
    }
}

fn home_dir() -> PathBuf {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `$ALMUSLIM_CONFIG`, else `~/.al-muslim/config.toml`.
pub fn default_config_path() -> PathBuf {
    match env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        Some(path) => PathBuf::from(path),
        None => home_dir().join(".al-muslim").join("config.toml"),
    }
}

/// The configuration file at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the file; `None` when it does not exist.
    pub fn load(&self) -> anyhow::Result<Option<UserConfig>> {
        if !self.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let config = UserConfig::from_toml(&text)
            .with_context(|| format!("failed to parse {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "loaded configuration");
        Ok(Some(config))
    }

    /// Merges `changes` into the file, creating it and its directory if needed.
    /// Keys this version does not know are preserved.
    pub fn update(&self, changes: &UserConfig) -> anyhow::Result<UserConfig> {
        let mut table = match fs::read_to_string(&self.path) {
            Ok(text) => text.parse::<toml::Table>().unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "replacing unparseable configuration");
                toml::Table::new()
            }),
            Err(_) => toml::Table::new(),
        };
        table.extend(to_table(changes)?);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(&table)?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "configuration saved");

        Ok(toml::Value::Table(table).try_into()?)
    }
}
