//! Low-order solar position model (NOAA general solar position series).
//!
//! Accurate to well under a minute of prayer time; not an ephemeris.

use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

/// Sun altitude at sunrise/sunset: refraction plus the solar semi-diameter.
pub const SUNRISE_ALTITUDE: f64 = -0.833;

/// Degrees of hour angle per hour of time.
pub const DEGREES_PER_HOUR: f64 = 15.0;

const MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Solar parameters for one civil date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarParams {
    /// Apparent minus mean solar time, in minutes.
    pub equation_of_time: f64,
    /// Solar declination in degrees.
    pub declination: f64,
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Day of year, 1-based.
pub fn day_of_year(date: NaiveDate) -> u32 {
    let month = date.month() as usize;
    let mut n: u32 = MONTH_DAYS[..month - 1].iter().sum::<u32>() + date.day();
    if is_leap_year(date.year()) && month > 2 {
        n += 1;
    }
    n
}

/// Equation of time and declination from the truncated Fourier series.
pub fn solar_params(date: NaiveDate) -> SolarParams {
    let gamma = 2.0 * PI / 365.0 * (day_of_year(date) as f64 - 1.0);

    let equation_of_time = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());

    let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    SolarParams {
        equation_of_time,
        declination: declination.to_degrees(),
    }
}

/// Local clock time of solar transit, in hours.
pub fn solar_noon(longitude: f64, utc_offset: f64, equation_of_time: f64) -> f64 {
    12.0 - equation_of_time / 60.0 - longitude / DEGREES_PER_HOUR + utc_offset
}

/// Hour angle (degrees, >= 0) at which the sun stands at `altitude` degrees.
///
/// Returns `None` when the sun never reaches that altitude on this day.
/// The range check runs on the raw cosine; the clamp only absorbs rounding.
pub fn hour_angle(latitude: f64, declination: f64, altitude: f64) -> Option<f64> {
    let lat = latitude.to_radians();
    let decl = declination.to_radians();
    let alt = altitude.to_radians();

    let cos_h = (alt.sin() - lat.sin() * decl.sin()) / (lat.cos() * decl.cos());
    if !(-1.0..=1.0).contains(&cos_h) {
        return None;
    }
    Some(cos_h.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Sun altitude (degrees) at which a shadow equals `shadow_factor` times the
/// object's length plus the noon shadow.
///
/// The noon shadow follows from the zenith distance at transit, |lat - decl|.
/// This differs from ||lat| - |decl|| only when latitude and declination lie
/// in opposite hemispheres, where the latter places Asr above the noon sun.
pub fn asr_altitude(latitude: f64, declination: f64, shadow_factor: f64) -> f64 {
    let noon_zenith = (latitude - declination).to_radians().abs();
    (PI / 2.0 - (shadow_factor + noon_zenith.tan()).atan()).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_of_year() {
        assert_eq!(day_of_year(date(2023, 1, 1)), 1);
        assert_eq!(day_of_year(date(2023, 3, 1)), 60);
        assert_eq!(day_of_year(date(2024, 3, 1)), 61);
        assert_eq!(day_of_year(date(2024, 2, 29)), 60);
        assert_eq!(day_of_year(date(2024, 12, 31)), 366);
        assert_eq!(day_of_year(date(1900, 3, 1)), 60);
        assert_eq!(day_of_year(date(2000, 3, 1)), 61);
    }

    #[test]
    fn test_declination_seasons() {
        let june = solar_params(date(2024, 6, 21));
        let december = solar_params(date(2024, 12, 21));
        let march = solar_params(date(2024, 3, 20));
        assert!((june.declination - 23.44).abs() < 0.3);
        assert!((december.declination + 23.44).abs() < 0.3);
        assert!(march.declination.abs() < 1.0);
    }

    #[test]
    fn test_equation_of_time_extremes() {
        // Early November the sun runs ~16 minutes fast, mid-February ~14 slow.
        assert!((solar_params(date(2024, 11, 3)).equation_of_time - 16.4).abs() < 0.6);
        assert!((solar_params(date(2024, 2, 11)).equation_of_time + 14.2).abs() < 0.6);
    }

    #[test]
    fn test_hour_angle_equator_equinox() {
        // Horizon crossing at the equator with zero declination is exactly 90°.
        let h = hour_angle(0.0, 0.0, 0.0).unwrap();
        assert!((h - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_hour_angle_unreachable() {
        // Midnight sun: the sun never drops to -18° at 70°N in June.
        assert!(hour_angle(70.0, 23.44, -18.0).is_none());
        // Polar night: never rises at 80°N in December.
        assert!(hour_angle(80.0, -23.44, SUNRISE_ALTITUDE).is_none());
    }

    #[test]
    fn test_asr_altitude_equal_shadow() {
        // Sun overhead at noon: shadow equals length at 45°.
        assert!((asr_altitude(10.0, 10.0, 1.0) - 45.0).abs() < 1e-9);
        // Hanafi is lower in the sky.
        assert!(asr_altitude(30.0, 5.0, 2.0) < asr_altitude(30.0, 5.0, 1.0));
    }

    #[test]
    fn test_solar_noon_greenwich() {
        assert!((solar_noon(0.0, 0.0, 0.0) - 12.0).abs() < 1e-12);
        assert!((solar_noon(45.0, 3.0, 0.0) - 12.0).abs() < 1e-12);
    }
}
