//! Core types shared by the almuslim crates.

use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

pub mod error;
pub mod location;
pub mod times;

pub use error::AlmuslimError;
pub use location::GeoLocation;
pub use times::{HijriDate, Prayer, PrayerTimes};

/// The four major Sunni schools of jurisprudence.
///
/// Only the Asr convention differs here: Hanafi waits until an object's
/// shadow is twice its length (plus the noon shadow), the others once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Madhab {
    #[default]
    Shafi,
    Hanafi,
    Maliki,
    Hanbali,
}

impl Madhab {
    /// Shadow-length multiplier used for the Asr altitude.
    pub fn asr_shadow_factor(&self) -> f64 {
        match self {
            Madhab::Hanafi => 2.0,
            Madhab::Shafi | Madhab::Maliki | Madhab::Hanbali => 1.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Madhab::Shafi => "shafi",
            Madhab::Hanafi => "hanafi",
            Madhab::Maliki => "maliki",
            Madhab::Hanbali => "hanbali",
        }
    }

    /// Parses a madhab name, falling back to Shafi for anything unrecognized.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("unknown madhab {:?}, using shafi", name);
            Madhab::Shafi
        })
    }
}

impl FromStr for Madhab {
    type Err = AlmuslimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shafi" | "shafii" | "shafi'i" => Ok(Madhab::Shafi),
            "hanafi" => Ok(Madhab::Hanafi),
            "maliki" => Ok(Madhab::Maliki),
            "hanbali" => Ok(Madhab::Hanbali),
            other => Err(AlmuslimError::invalid_config(format!("unknown madhab '{}'", other))),
        }
    }
}

impl fmt::Display for Madhab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How Isha is derived for a calculation method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum IshaRule {
    /// Sun depression angle below the horizon, in degrees.
    Angle(f64),
    /// Fixed interval after Maghrib.
    MinutesAfterMaghrib(u32),
}

/// Twilight parameters of a calculation method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MethodParams {
    /// Sun depression angle for Fajr, in degrees (positive, below horizon).
    pub fajr_angle: f64,
    pub isha: IshaRule,
}

impl MethodParams {
    pub fn new(fajr_angle: f64, isha: IshaRule) -> Self {
        Self { fajr_angle, isha }
    }

    /// Isha depression angle, or `None` for fixed-offset methods.
    pub fn isha_angle(&self) -> Option<f64> {
        match self.isha {
            IshaRule::Angle(a) => Some(a),
            IshaRule::MinutesAfterMaghrib(_) => None,
        }
    }

    /// Fixed Isha offset in minutes, or `None` for angle-based methods.
    pub fn isha_offset_minutes(&self) -> Option<u32> {
        match self.isha {
            IshaRule::Angle(_) => None,
            IshaRule::MinutesAfterMaghrib(m) => Some(m),
        }
    }
}

/// Regional calculation conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// Muslim World League.
    #[default]
    Mwl,
    /// Islamic Society of North America.
    Isna,
    /// Umm al-Qura, Makkah.
    UmmAlQura,
    /// Egyptian General Authority of Survey.
    Egypt,
    /// University of Islamic Sciences, Karachi.
    Karachi,
    /// Institute of Geophysics, University of Tehran.
    Tehran,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 6] = [
        CalculationMethod::UmmAlQura,
        CalculationMethod::Mwl,
        CalculationMethod::Isna,
        CalculationMethod::Egypt,
        CalculationMethod::Karachi,
        CalculationMethod::Tehran,
    ];

    pub fn params(&self) -> MethodParams {
        match self {
            CalculationMethod::Mwl => MethodParams::new(18.0, IshaRule::Angle(17.0)),
            CalculationMethod::Isna => MethodParams::new(15.0, IshaRule::Angle(15.0)),
            CalculationMethod::UmmAlQura => MethodParams::new(18.5, IshaRule::MinutesAfterMaghrib(90)),
            CalculationMethod::Egypt => MethodParams::new(19.5, IshaRule::Angle(17.5)),
            CalculationMethod::Karachi => MethodParams::new(18.0, IshaRule::Angle(18.0)),
            CalculationMethod::Tehran => MethodParams::new(17.7, IshaRule::Angle(14.0)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CalculationMethod::Mwl => "mwl",
            CalculationMethod::Isna => "isna",
            CalculationMethod::UmmAlQura => "umm_al_qura",
            CalculationMethod::Egypt => "egypt",
            CalculationMethod::Karachi => "karachi",
            CalculationMethod::Tehran => "tehran",
        }
    }

    /// Parses a method name. Unrecognized names get the MWL angles.
    pub fn from_name_lossy(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            log::warn!("unknown calculation method {:?}, using mwl angles", name);
            CalculationMethod::Mwl
        })
    }
}

impl FromStr for CalculationMethod {
    type Err = AlmuslimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mwl" => Ok(CalculationMethod::Mwl),
            "isna" => Ok(CalculationMethod::Isna),
            "umm_al_qura" | "makkah" => Ok(CalculationMethod::UmmAlQura),
            "egypt" => Ok(CalculationMethod::Egypt),
            "karachi" => Ok(CalculationMethod::Karachi),
            "tehran" => Ok(CalculationMethod::Tehran),
            other => Err(AlmuslimError::invalid_config(format!("unknown calculation method '{}'", other))),
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fallback for Fajr/Isha when the sun never gets deep enough below the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighLatitudeRule {
    MiddleOfTheNight,
    SeventhOfTheNight,
    TwilightAngle,
}

impl HighLatitudeRule {
    /// Fraction of the night (sunset to next sunrise) used to place Fajr/Isha.
    ///
    /// `TwilightAngle` is the simplified angle/60 heuristic; a fixed-offset
    /// Isha contributes an angle of 0.
    pub fn night_portion(&self, params: &MethodParams) -> f64 {
        match self {
            HighLatitudeRule::MiddleOfTheNight => 0.5,
            HighLatitudeRule::SeventhOfTheNight => 1.0 / 7.0,
            HighLatitudeRule::TwilightAngle => {
                params.fajr_angle.max(params.isha_angle().unwrap_or(0.0)) / 60.0
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HighLatitudeRule::MiddleOfTheNight => "middle_of_the_night",
            HighLatitudeRule::SeventhOfTheNight => "seventh_of_the_night",
            HighLatitudeRule::TwilightAngle => "twilight_angle",
        }
    }

    /// Parses a rule name where `none` or an empty string disables the fallback.
    pub fn parse_optional(name: &str) -> Result<Option<Self>, AlmuslimError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(None),
            other => other.parse().map(Some),
        }
    }
}

impl FromStr for HighLatitudeRule {
    type Err = AlmuslimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "middle_of_the_night" => Ok(HighLatitudeRule::MiddleOfTheNight),
            "seventh_of_the_night" => Ok(HighLatitudeRule::SeventhOfTheNight),
            "twilight_angle" => Ok(HighLatitudeRule::TwilightAngle),
            other => Err(AlmuslimError::invalid_config(format!("unknown high-latitude rule '{}'", other))),
        }
    }
}

impl fmt::Display for HighLatitudeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prayer time engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalculationConfig {
    pub method: CalculationMethod,
    pub madhab: Madhab,
    pub high_latitude_rule: Option<HighLatitudeRule>,
    /// Explicit UTC offset in hours. `None` uses the system's current offset.
    pub utc_offset: Option<f64>,
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self {
            method: CalculationMethod::default(),
            madhab: Madhab::default(),
            high_latitude_rule: Some(HighLatitudeRule::MiddleOfTheNight),
            utc_offset: None,
        }
    }
}

impl CalculationConfig {
    pub fn new() -> Self { Self::default() }

    pub fn method(mut self, method: CalculationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn madhab(mut self, madhab: Madhab) -> Self {
        self.madhab = madhab;
        self
    }

    pub fn high_latitude_rule(mut self, rule: Option<HighLatitudeRule>) -> Self {
        self.high_latitude_rule = rule;
        self
    }

    pub fn utc_offset(mut self, hours: f64) -> Self {
        self.utc_offset = Some(hours);
        self
    }

    pub fn builder() -> CalculationConfigBuilder {
        CalculationConfigBuilder::new()
    }
}

/// Builder with validation for `CalculationConfig`.
#[derive(Debug, Default)]
pub struct CalculationConfigBuilder {
    method: Option<CalculationMethod>,
    madhab: Option<Madhab>,
    high_latitude_rule: Option<Option<HighLatitudeRule>>,
    utc_offset: Option<f64>,
}

impl CalculationConfigBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn method(mut self, method: CalculationMethod) -> Self { self.method = Some(method); self }
    pub fn madhab(mut self, madhab: Madhab) -> Self { self.madhab = Some(madhab); self }
    pub fn high_latitude_rule(mut self, rule: Option<HighLatitudeRule>) -> Self { self.high_latitude_rule = Some(rule); self }
    pub fn utc_offset(mut self, hours: f64) -> Self { self.utc_offset = Some(hours); self }

    /// Builds and validates. UTC offsets must lie within [-12, +14] hours.
    pub fn build(self) -> Result<CalculationConfig, AlmuslimError> {
        if let Some(offset) = self.utc_offset {
            if !offset.is_finite() || !(-12.0..=14.0).contains(&offset) {
                return Err(AlmuslimError::invalid_config(format!(
                    "UTC offset {} outside [-12, +14]", offset
                )));
            }
        }

        let defaults = CalculationConfig::default();
        Ok(CalculationConfig {
            method: self.method.unwrap_or(defaults.method),
            madhab: self.madhab.unwrap_or(defaults.madhab),
            high_latitude_rule: self.high_latitude_rule.unwrap_or(defaults.high_latitude_rule),
            utc_offset: self.utc_offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_presets() {
        let mwl = CalculationMethod::Mwl.params();
        assert_eq!(mwl.fajr_angle, 18.0);
        assert_eq!(mwl.isha_angle(), Some(17.0));

        let uq = CalculationMethod::UmmAlQura.params();
        assert_eq!(uq.fajr_angle, 18.5);
        assert_eq!(uq.isha_angle(), None);
        assert_eq!(uq.isha_offset_minutes(), Some(90));

        assert_eq!(CalculationMethod::Tehran.params().isha_angle(), Some(14.0));
        assert_eq!(CalculationMethod::Egypt.params().fajr_angle, 19.5);
    }

    #[test]
    fn test_method_aliases_and_unknown() {
        assert_eq!("makkah".parse::<CalculationMethod>().unwrap(), CalculationMethod::UmmAlQura);
        assert_eq!(" ISNA ".parse::<CalculationMethod>().unwrap(), CalculationMethod::Isna);
        assert!("jafari".parse::<CalculationMethod>().is_err());
        assert_eq!(CalculationMethod::from_name_lossy("jafari"), CalculationMethod::Mwl);
    }

    #[test]
    fn test_madhab_factor() {
        assert_eq!(Madhab::Hanafi.asr_shadow_factor(), 2.0);
        assert_eq!(Madhab::Shafi.asr_shadow_factor(), 1.0);
        assert_eq!(Madhab::Hanbali.asr_shadow_factor(), 1.0);
        assert_eq!(Madhab::from_name_lossy("zahiri"), Madhab::Shafi);
    }

    #[test]
    fn test_night_portion() {
        let uq = CalculationMethod::UmmAlQura.params();
        let egypt = CalculationMethod::Egypt.params();
        assert_eq!(HighLatitudeRule::MiddleOfTheNight.night_portion(&uq), 0.5);
        assert!((HighLatitudeRule::SeventhOfTheNight.night_portion(&uq) - 1.0 / 7.0).abs() < 1e-12);
        assert!((HighLatitudeRule::TwilightAngle.night_portion(&uq) - 18.5 / 60.0).abs() < 1e-12);
        assert!((HighLatitudeRule::TwilightAngle.night_portion(&egypt) - 19.5 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_rule_parse_optional() {
        assert_eq!(HighLatitudeRule::parse_optional("none").unwrap(), None);
        assert_eq!(
            HighLatitudeRule::parse_optional("twilight_angle").unwrap(),
            Some(HighLatitudeRule::TwilightAngle)
        );
        assert!(HighLatitudeRule::parse_optional("angle_based").is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let cfg = CalculationConfig::builder().madhab(Madhab::Hanafi).build().unwrap();
        assert_eq!(cfg.madhab, Madhab::Hanafi);
        assert_eq!(cfg.method, CalculationMethod::Mwl);
        assert_eq!(cfg.high_latitude_rule, Some(HighLatitudeRule::MiddleOfTheNight));
        assert_eq!(cfg.utc_offset, None);
    }

    #[test]
    fn test_builder_rejects_bad_offset() {
        let res = CalculationConfig::builder().utc_offset(15.5).build();
        assert!(matches!(res, Err(AlmuslimError::InvalidConfiguration { .. })));
        assert!(CalculationConfig::builder().utc_offset(5.5).build().is_ok());
    }
}
