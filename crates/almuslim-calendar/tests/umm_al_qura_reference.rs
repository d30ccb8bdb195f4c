//! Cross-checks against the `hijri_date` crate's Umm al-Qura conversion.

use std::path::PathBuf;

use almuslim_calendar::{HijriCalendar, MonthStartTable, tabular_to_hijri};
use chrono::{Datelike, NaiveDate};
use hijri_date::HijriDate as Reference;

fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn reference(date: NaiveDate) -> (i32, u32, u32) {
    let h = Reference::from_gr(date.year() as usize, date.month() as usize, date.day() as usize)
        .expect("date inside hijri_date range");
    (h.year() as i32, h.month() as u32, h.day() as u32)
}

#[test]
fn bundled_table_matches_reference_mid_month() {
    let calendar = HijriCalendar::new(bundled_data_dir());
    assert!(calendar.strategy().is_table(), "bundled table missing");

    let table = MonthStartTable::load_from_data_dir(bundled_data_dir());
    let (start, end) = table.coverage().unwrap();

    let mut date = start;
    let mut checked = 0;
    while date <= end {
        let (year, month, day) = reference(date);
        if (10..=20).contains(&day) {
            let ours = calendar.lookup(date).unwrap();
            assert_eq!((ours.year, ours.month), (year, month), "{date}");
            assert!((ours.day as i64 - day as i64).abs() <= 1, "{date}: {ours:?} vs {day}");
            checked += 1;
        }
        date = date.succ_opt().unwrap();
    }
    assert!(checked > 400);
}

#[test]
fn tabular_close_to_reference() {
    let mut date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap();
    while date <= end {
        let (year, month, day) = reference(date);
        if (12..=18).contains(&day) {
            let ours = tabular_to_hijri(date);
            assert_eq!((ours.year, ours.month), (year, month), "{date}");
            assert!((ours.day as i64 - day as i64).abs() <= 3, "{date}: {ours:?} vs {day}");
        }
        date += chrono::Duration::days(3);
    }
}
