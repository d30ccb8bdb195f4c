//! Arithmetic (tabular) Islamic calendar.
//!
//! An approximation: it follows a fixed 30-year cycle with alternating 30/29
//! day months and ignores actual lunar sighting, so results can differ from
//! the Umm al-Qura calendar or local announcements by one or two days.

use almuslim_types::HijriDate;
use chrono::{Datelike, NaiveDate};

/// Julian Day Number of 1 Muharram AH 1, minus one.
const HIJRI_EPOCH_JDN: i64 = 1_948_439;
/// Days in one 30-year cycle.
const CYCLE_DAYS: i64 = 10_631;
/// Mean Hijri year length in days.
const MEAN_YEAR_DAYS: f64 = 354.366_67;
const MONTH_LENGTHS: [i64; 12] = [30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29];

/// Julian Day Number of a proleptic Gregorian date.
pub fn julian_day_number(date: NaiveDate) -> i64 {
    let year = i64::from(date.year());
    let month = i64::from(date.month());
    let day = i64::from(date.day());

    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) - 32045
}

/// Converts a Gregorian date with the tabular approximation.
pub fn tabular_to_hijri(date: NaiveDate) -> HijriDate {
    let days = julian_day_number(date) - HIJRI_EPOCH_JDN;
    let cycles = days.div_euclid(CYCLE_DAYS);
    let in_cycle = days.rem_euclid(CYCLE_DAYS);

    let year_in_cycle = (((in_cycle as f64 - 0.1335) / MEAN_YEAR_DAYS) as i64).max(0);
    let year = 1 + year_in_cycle + 30 * cycles;

    let day_of_year = (in_cycle - (year_in_cycle as f64 * MEAN_YEAR_DAYS + 0.5).floor() as i64).max(0);

    let mut month = 1;
    let mut day = day_of_year + 1;
    for len in MONTH_LENGTHS {
        if day > len {
            day -= len;
            month += 1;
        } else {
            break;
        }
    }

    HijriDate::new(year as i32, month.clamp(1, 12) as u32, day as u32)
}
