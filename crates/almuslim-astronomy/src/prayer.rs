//! Prayer Times Calculation Module.
//!
//! Calculates the six daily times from the solar model: Fajr and Isha from
//! twilight depression angles, sunrise/sunset from the standard horizon
//! altitude, Dhuhr at transit and Asr from the shadow-length rule.

use chrono::{Local, NaiveDate, Offset};
use almuslim_types::{AlmuslimError, CalculationConfig, GeoLocation, Prayer, PrayerTimes};
use crate::solar::{self, DEGREES_PER_HOUR, SUNRISE_ALTITUDE};

/// UTC offset of the system clock right now, in hours.
///
/// This is the offset for "now", not for the date being computed, so DST
/// transitions between today and that date are not reflected.
pub fn local_utc_offset_hours() -> f64 {
    Local::now().offset().fix().local_minus_utc() as f64 / 3600.0
}

/// Calculates prayer times for a given date and location.
///
/// # Arguments
/// * `date` - The local civil date
/// * `location` - Observer coordinates (longitude east-positive)
/// * `config` - Method, madhab, high-latitude rule and optional UTC offset
///
/// # Errors
/// Returns `AlmuslimError::Unreachable` when sunrise, Asr, or (without a
/// usable high-latitude rule) Fajr cannot occur on this date.
///
/// # Example
/// ```rust
/// use chrono::NaiveDate;
/// use almuslim_types::{CalculationConfig, CalculationMethod, GeoLocation};
/// use almuslim_astronomy::prayer::calculate_prayer_times;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
/// let makkah = GeoLocation::new(21.4225, 39.8262).unwrap();
/// let config = CalculationConfig::new()
///     .method(CalculationMethod::UmmAlQura)
///     .utc_offset(3.0);
///
/// let times = calculate_prayer_times(date, makkah, &config).unwrap();
/// assert!(times.fajr < times.sunrise);
/// assert!((times.isha - times.maghrib - 1.5).abs() < 1e-9);
/// ```
pub fn calculate_prayer_times(
    date: NaiveDate,
    location: GeoLocation,
    config: &CalculationConfig,
) -> Result<PrayerTimes, AlmuslimError> {
    let lat = location.lat;
    let sun = solar::solar_params(date);
    let utc_offset = config.utc_offset.unwrap_or_else(local_utc_offset_hours);
    let noon = solar::solar_noon(location.lng, utc_offset, sun.equation_of_time);
    let unreachable = |event: Prayer| AlmuslimError::unreachable(event, lat, date);

    // Sunrise/sunset
    let h_horizon = solar::hour_angle(lat, sun.declination, SUNRISE_ALTITUDE)
        .ok_or_else(|| unreachable(Prayer::Sunrise))?;
    let sunrise = noon - h_horizon / DEGREES_PER_HOUR;
    let sunset = noon + h_horizon / DEGREES_PER_HOUR;

    // Twilight
    let params = config.method.params();
    let mut h_fajr = solar::hour_angle(lat, sun.declination, -params.fajr_angle);
    let mut h_isha = params
        .isha_angle()
        .and_then(|angle| solar::hour_angle(lat, sun.declination, -angle));
    let isha_needs_angle = params.isha_offset_minutes().is_none();

    if h_fajr.is_none() || (isha_needs_angle && h_isha.is_none()) {
        if let Some(rule) = config.high_latitude_rule {
            let night = 24.0 - sunset + sunrise;
            let adjustment = rule.night_portion(&params) * night;
            log::debug!(
                "applying {} at latitude {:.4} on {}: night {:.2}h, portion {:.2}h",
                rule, lat, date, night, adjustment
            );
            if h_fajr.is_none() {
                h_fajr = Some(DEGREES_PER_HOUR * (noon - (sunrise - adjustment)));
            }
            if isha_needs_angle && h_isha.is_none() {
                h_isha = Some(DEGREES_PER_HOUR * ((sunset + adjustment) - noon));
            }
        }
    }

    let fajr = noon - h_fajr.ok_or_else(|| unreachable(Prayer::Fajr))? / DEGREES_PER_HOUR;

    let isha = isha_time(params.isha_offset_minutes(), h_isha, noon, sunset);

    // Asr
    let asr_alt = solar::asr_altitude(lat, sun.declination, config.madhab.asr_shadow_factor());
    let h_asr = solar::hour_angle(lat, sun.declination, asr_alt)
        .ok_or_else(|| unreachable(Prayer::Asr))?;

    Ok(PrayerTimes {
        fajr,
        sunrise,
        dhuhr: noon,
        asr: noon + h_asr / DEGREES_PER_HOUR,
        maghrib: sunset,
        isha,
    })
}

/// Hours after Maghrib used when no Isha policy yields a time.
const ISHA_FALLBACK_HOURS: f64 = 1.5;

/// Fixed offset first, then the Isha hour angle, then a flat 90 minutes.
///
/// The last arm is not reached by the built-in presets: every Isha angle is
/// at most its Fajr angle, and an unreachable Fajr already failed above.
fn isha_time(offset_minutes: Option<u32>, hour_angle: Option<f64>, noon: f64, sunset: f64) -> f64 {
    match (offset_minutes, hour_angle) {
        (Some(minutes), _) => sunset + minutes as f64 / 60.0,
        (None, Some(h)) => noon + h / DEGREES_PER_HOUR,
        (None, None) => {
            log::warn!("no Isha hour angle, using Maghrib + {ISHA_FALLBACK_HOURS}h");
            sunset + ISHA_FALLBACK_HOURS
        }
    }
}
