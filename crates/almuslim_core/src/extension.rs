//! Extension trait for `NaiveDate`.

use chrono::NaiveDate;

use crate::{
    AlmuslimError, CalculationConfig, GeoLocation, HijriCalendar, HijriDate, PrayerSchedule,
    PrayerTimes, calculate_prayer_times, tabular_to_hijri, weekly_schedule,
};

/// Extends `NaiveDate` with prayer time and Hijri helpers.
pub trait PrayerDateExt {
    /// Prayer times for this date.
    fn prayer_times(&self, location: GeoLocation, config: &CalculationConfig) -> Result<PrayerTimes, AlmuslimError>;

    /// Seven-day schedule starting at this date.
    fn prayer_week(&self, location: GeoLocation, config: CalculationConfig) -> PrayerSchedule;

    /// Hijri date using `calendar`'s table and adjustment.
    fn hijri(&self, calendar: &HijriCalendar) -> HijriDate;

    /// Hijri date from the arithmetic calendar alone.
    fn tabular_hijri(&self) -> HijriDate;
}

impl PrayerDateExt for NaiveDate {
    fn prayer_times(&self, location: GeoLocation, config: &CalculationConfig) -> Result<PrayerTimes, AlmuslimError> {
        calculate_prayer_times(*self, location, config)
    }

    fn prayer_week(&self, location: GeoLocation, config: CalculationConfig) -> PrayerSchedule {
        weekly_schedule(*self, location, config)
    }

    fn hijri(&self, calendar: &HijriCalendar) -> HijriDate {
        calendar.to_hijri(*self)
    }

    fn tabular_hijri(&self) -> HijriDate {
        tabular_to_hijri(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HijriDateExt, MonthStartTable};

    #[test]
    fn test_extension_trait() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
        let loc = GeoLocation::new(21.4225, 39.8262).unwrap();
        let cfg = CalculationConfig::new().utc_offset(3.0);
        let times = date.prayer_times(loc, &cfg).unwrap();
        assert!(times.fajr < times.isha);
        assert_eq!(date.prayer_week(loc, cfg).count(), 7);
    }

    #[test]
    fn test_hijri_with_table() {
        let table = MonthStartTable::parse("header\n1445,9,2024,3,11\n");
        let calendar = HijriCalendar::with_table(table);
        let date = NaiveDate::from_ymd_opt(2024, 3, 19).unwrap();
        assert_eq!(date.hijri(&calendar).display_en(), "9 Ramadan 1445 AH");
        assert_eq!(date.tabular_hijri(), HijriDate::new(1445, 9, 10));
    }
}
