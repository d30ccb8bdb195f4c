pub mod extension;

pub use almuslim_types as types;
pub use almuslim_types::{
    AlmuslimError, CalculationConfig, CalculationConfigBuilder, CalculationMethod, GeoLocation,
    HighLatitudeRule, HijriDate, IshaRule, Madhab, MethodParams, Prayer, PrayerTimes,
};
pub use almuslim_astronomy::{
    calculate_prayer_times, clock_parts, format_clock, format_duration, local_utc_offset_hours,
    solar,
};
pub use almuslim_calendar::{
    HijriCalendar, HijriDateExt, HijriStrategy, MonthStartRecord, MonthStartTable,
    TABLE_RELATIVE_PATH, month_name_ar, month_name_en, tabular_to_hijri, to_arabic_digits,
};
pub use extension::PrayerDateExt;

#[cfg(feature = "async")]
pub use almuslim_network as network;

pub mod prelude {
    pub use crate::types::*;
    pub use crate::calculate_prayer_times;
    pub use crate::{HijriCalendar, HijriDateExt, PrayerDateExt};
    pub use crate::{format_clock, format_duration};
}

use std::io::{self, Write};

use chrono::NaiveDate;

/// Header row of the schedule CSV export.
pub const SCHEDULE_CSV_HEADER: &str = "date,fajr,sunrise,dhuhr,asr,maghrib,isha";

/// Iterator computing prayer times for consecutive days.
pub struct PrayerSchedule {
    current: Option<NaiveDate>,
    end: NaiveDate,
    location: GeoLocation,
    config: CalculationConfig,
}

impl Iterator for PrayerSchedule {
    type Item = (NaiveDate, Result<PrayerTimes, AlmuslimError>);

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.current.filter(|d| *d <= self.end)?;
        self.current = date.succ_opt();
        Some((date, calculate_prayer_times(date, self.location, &self.config)))
    }
}

/// Prayer times for every day from `start` to `end`, inclusive.
pub fn generate_schedule(
    start: NaiveDate,
    end: NaiveDate,
    location: GeoLocation,
    config: CalculationConfig,
) -> PrayerSchedule {
    PrayerSchedule {
        current: Some(start),
        end,
        location,
        config,
    }
}

/// Seven days starting at `start`.
pub fn weekly_schedule(start: NaiveDate, location: GeoLocation, config: CalculationConfig) -> PrayerSchedule {
    let end = start.checked_add_days(chrono::Days::new(6)).unwrap_or(NaiveDate::MAX);
    generate_schedule(start, end, location, config)
}

/// Writes a schedule as CSV with 24-hour times. Days that cannot be computed
/// are skipped. Returns the number of data rows written.
pub fn write_schedule_csv<W: Write>(mut writer: W, schedule: PrayerSchedule) -> io::Result<usize> {
    writeln!(writer, "{SCHEDULE_CSV_HEADER}")?;
    let mut rows = 0;
    for (date, result) in schedule {
        match result {
            Ok(times) => {
                let cells: Vec<String> = times
                    .entries()
                    .iter()
                    .map(|(_, hours)| format_clock(*hours, true))
                    .collect();
                writeln!(writer, "{},{}", date.format("%Y-%m-%d"), cells.join(","))?;
                rows += 1;
            }
            Err(e) => log::warn!("skipping {date} in export: {e}"),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn makkah() -> (GeoLocation, CalculationConfig) {
        (
            GeoLocation::new(21.4225, 39.8262).unwrap(),
            CalculationConfig::new()
                .method(CalculationMethod::UmmAlQura)
                .utc_offset(3.0),
        )
    }

    #[test]
    fn test_schedule_inclusive_range() {
        let (loc, cfg) = makkah();
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let days: Vec<_> = generate_schedule(start, end, loc, cfg).collect();
        assert_eq!(days.len(), 10);
        assert_eq!(days[0].0, start);
        assert_eq!(days[9].0, end);
        assert!(days.iter().all(|(_, r)| r.is_ok()));
    }

    #[test]
    fn test_schedule_empty_when_reversed() {
        let (loc, cfg) = makkah();
        let start = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(generate_schedule(start, end, loc, cfg).count(), 0);
    }

    #[test]
    fn test_schedule_at_max_date_terminates() {
        let (loc, cfg) = makkah();
        assert_eq!(generate_schedule(NaiveDate::MAX, NaiveDate::MAX, loc, cfg).count(), 1);
    }

    #[test]
    fn test_weekly_schedule() {
        let (loc, cfg) = makkah();
        let start = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        let days: Vec<NaiveDate> = weekly_schedule(start, loc, cfg).map(|(d, _)| d).collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[6], NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());
    }

    #[test]
    fn test_csv_export() {
        let (loc, cfg) = makkah();
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let mut out = Vec::new();
        let rows = write_schedule_csv(&mut out, generate_schedule(date, date, loc, cfg)).unwrap();
        assert_eq!(rows, 1);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], SCHEDULE_CSV_HEADER);
        assert!(lines[1].starts_with("2024-03-20,05:09,06:25,12:29,15:53,18:32,20:02"), "{}", lines[1]);
    }

    #[test]
    fn test_csv_export_skips_unreachable_days() {
        let loc = GeoLocation::new(64.0, 18.0).unwrap();
        let cfg = CalculationConfig::new().high_latitude_rule(None).utc_offset(2.0);
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let mut out = Vec::new();
        let rows = write_schedule_csv(&mut out, generate_schedule(date, date, loc, cfg)).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
