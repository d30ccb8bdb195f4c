//! Timezone strings to UTC offsets.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

/// Parses a fixed offset: `UTC`, `GMT`, `Z`, `UTC+3`, `GMT-04:30`, `+05:30`, `-3`.
pub fn parse_fixed_offset(s: &str) -> Option<f64> {
    let s = s.trim();
    let lower = s.to_ascii_lowercase();
    if matches!(lower.as_str(), "utc" | "gmt" | "z") {
        return Some(0.0);
    }

    let rest = lower
        .strip_prefix("utc")
        .or_else(|| lower.strip_prefix("gmt"))
        .unwrap_or(&lower)
        .trim();
    let (sign, digits) = match rest.as_bytes().first()? {
        b'+' => (1.0, rest[1..].trim_start()),
        b'-' => (-1.0, rest[1..].trim_start()),
        _ => (1.0, rest),
    };

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (digits.parse::<u32>().ok()?, 0),
    };
    if hours > 14 || minutes >= 60 {
        return None;
    }
    Some(sign * (hours as f64 + minutes as f64 / 60.0))
}

/// UTC offset in hours for `tz` on `date`.
///
/// IANA names are evaluated at local noon of `date`, so daylight saving
/// time is honored. Returns `None` for anything unrecognized.
pub fn resolve_offset(tz: &str, date: NaiveDate) -> Option<f64> {
    if let Some(hours) = parse_fixed_offset(tz) {
        return Some(hours);
    }
    let zone: Tz = tz.trim().parse().ok()?;
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0)?);
    let local = zone.from_local_datetime(&noon).earliest()?;
    Some(local.offset().fix().local_minus_utc() as f64 / 3600.0)
}

/// Current wall-clock time in `tz`, or in the system zone when `tz` is
/// missing or unrecognized.
pub fn now_in(tz: Option<&str>) -> NaiveDateTime {
    let utc = Utc::now();
    let Some(tz) = tz.map(str::trim).filter(|t| !t.is_empty()) else {
        return Local::now().naive_local();
    };
    if let Some(hours) = parse_fixed_offset(tz) {
        return utc.naive_utc() + Duration::seconds((hours * 3600.0).round() as i64);
    }
    match tz.parse::<Tz>() {
        Ok(zone) => utc.with_timezone(&zone).naive_local(),
        Err(_) => Local::now().naive_local(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_fixed_offsets() {
        assert_eq!(parse_fixed_offset("UTC"), Some(0.0));
        assert_eq!(parse_fixed_offset("z"), Some(0.0));
        assert_eq!(parse_fixed_offset("UTC+3"), Some(3.0));
        assert_eq!(parse_fixed_offset("GMT-04:30"), Some(-4.5));
        assert_eq!(parse_fixed_offset("+05:30"), Some(5.5));
        assert_eq!(parse_fixed_offset("-3"), Some(-3.0));
        assert_eq!(parse_fixed_offset("utc + 2"), Some(2.0));
    }

    #[test]
    fn test_fixed_offset_rejects_garbage() {
        assert_eq!(parse_fixed_offset(""), None);
        assert_eq!(parse_fixed_offset("Asia/Riyadh"), None);
        assert_eq!(parse_fixed_offset("+3:75"), None);
        assert_eq!(parse_fixed_offset("+99"), None);
    }

    #[test]
    fn test_iana_offsets() {
        assert_eq!(resolve_offset("Asia/Riyadh", date(2024, 3, 20)), Some(3.0));
        assert_eq!(resolve_offset("Asia/Kolkata", date(2024, 1, 1)), Some(5.5));
    }

    #[test]
    fn test_iana_daylight_saving() {
        assert_eq!(resolve_offset("Europe/London", date(2024, 1, 15)), Some(0.0));
        assert_eq!(resolve_offset("Europe/London", date(2024, 6, 21)), Some(1.0));
        assert_eq!(resolve_offset("America/New_York", date(2024, 7, 4)), Some(-4.0));
    }

    #[test]
    fn test_now_in_fixed_offset() {
        let utc = Utc::now().naive_utc();
        let shifted = now_in(Some("UTC+3"));
        let diff = (shifted - utc).num_seconds();
        assert!((10_790..=10_810).contains(&diff), "{diff}");
        assert!((now_in(Some("UTC")) - Utc::now().naive_utc()).num_seconds().abs() < 10);
    }

    #[test]
    fn test_unknown_zone() {
        assert_eq!(resolve_offset("Mars/Olympus_Mons", date(2024, 1, 1)), None);
    }
}
