//! Hijri calendar conversion.
//!
//! Two strategies sit behind [`HijriCalendar`]: the Umm al-Qura month-start
//! table when one is available, and the arithmetic calendar otherwise (or
//! for dates the table does not cover).

pub mod names;
pub mod table;
pub mod tabular;

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use almuslim_types::HijriDate;
use chrono::{Duration, NaiveDate};

pub use names::{HijriDateExt, month_name_ar, month_name_en, to_arabic_digits};
pub use table::{MonthStartRecord, MonthStartTable, TABLE_RELATIVE_PATH};
pub use tabular::{julian_day_number, tabular_to_hijri};

/// Largest moon-sighting adjustment accepted, in days.
pub const MAX_ADJUSTMENT_DAYS: i64 = 30;

/// Which conversion a calendar resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HijriStrategy {
    /// Umm al-Qura month starts; uncovered dates use the arithmetic calendar.
    Table(MonthStartTable),
    /// Arithmetic calendar only.
    Tabular,
}

impl HijriStrategy {
    fn from_table(table: MonthStartTable) -> Self {
        if table.is_empty() { Self::Tabular } else { Self::Table(table) }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }
}

/// Hijri converter owning its lazily loaded month-start table.
///
/// The table is read at most once, on the first conversion.
///
/// # Example
/// ```rust
/// use chrono::NaiveDate;
/// use almuslim_calendar::{HijriCalendar, HijriDateExt};
///
/// let calendar = HijriCalendar::tabular();
/// let date = NaiveDate::from_ymd_opt(2024, 7, 7).unwrap();
/// assert_eq!(calendar.to_hijri(date).display_en(), "1 Muharram 1446 AH");
/// ```
#[derive(Debug, Default)]
pub struct HijriCalendar {
    data_dir: Option<PathBuf>,
    strategy: OnceLock<HijriStrategy>,
    adjustment: i64,
}

impl HijriCalendar {
    /// Calendar reading `hijri/umm_al_qura_month_starts.csv` under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            ..Self::default()
        }
    }

    /// Calendar that always uses the arithmetic approximation.
    pub fn tabular() -> Self {
        Self::default()
    }

    /// Calendar backed by an already loaded table.
    pub fn with_table(table: MonthStartTable) -> Self {
        let calendar = Self::default();
        let _ = calendar.strategy.set(HijriStrategy::from_table(table));
        calendar
    }

    /// Shifts queried dates by `days` before conversion, clamped to ±30.
    pub fn with_adjustment(mut self, days: i64) -> Self {
        let clamped = days.clamp(-MAX_ADJUSTMENT_DAYS, MAX_ADJUSTMENT_DAYS);
        if clamped != days {
            log::warn!("Hijri adjustment {days} clamped to {clamped}");
        }
        self.adjustment = clamped;
        self
    }

    pub fn adjustment(&self) -> i64 {
        self.adjustment
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Resolved strategy, loading the table on first use.
    pub fn strategy(&self) -> &HijriStrategy {
        self.strategy.get_or_init(|| match &self.data_dir {
            Some(dir) => HijriStrategy::from_table(MonthStartTable::load_from_data_dir(dir)),
            None => HijriStrategy::Tabular,
        })
    }

    /// Table lookup only; `None` when no table is loaded or it does not cover `date`.
    pub fn lookup(&self, date: NaiveDate) -> Option<HijriDate> {
        match self.strategy() {
            HijriStrategy::Table(table) => table.lookup(self.adjusted(date)),
            HijriStrategy::Tabular => None,
        }
    }

    /// Converts a Gregorian date, falling back to the arithmetic calendar.
    pub fn to_hijri(&self, date: NaiveDate) -> HijriDate {
        let date = self.adjusted(date);
        match self.strategy() {
            HijriStrategy::Table(table) => table.lookup(date).unwrap_or_else(|| {
                log::debug!("{date} outside the Umm al-Qura table, using arithmetic calendar");
                tabular_to_hijri(date)
            }),
            HijriStrategy::Tabular => tabular_to_hijri(date),
        }
    }

    fn adjusted(&self, date: NaiveDate) -> NaiveDate {
        date.checked_add_signed(Duration::days(self.adjustment))
            .unwrap_or(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = "\
hijri_year,hijri_month,gregorian_year,gregorian_month,gregorian_day
1445,9,2024,3,11
1445,10,2024,4,10
";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn data_dir_with_table() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("hijri")).unwrap();
        fs::write(dir.path().join(TABLE_RELATIVE_PATH), SAMPLE).unwrap();
        dir
    }

    #[test]
    fn test_table_strategy() {
        let dir = data_dir_with_table();
        let calendar = HijriCalendar::new(dir.path());
        assert!(calendar.strategy().is_table());
        assert_eq!(calendar.to_hijri(date(2024, 3, 11)), HijriDate::new(1445, 9, 1));
        assert_eq!(calendar.lookup(date(2024, 3, 10)), None);
    }

    #[test]
    fn test_missing_table_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let calendar = HijriCalendar::new(dir.path());
        assert_eq!(calendar.strategy(), &HijriStrategy::Tabular);
        assert_eq!(calendar.to_hijri(date(2024, 3, 20)), HijriDate::new(1445, 9, 11));
    }

    #[test]
    fn test_uncovered_date_uses_arithmetic() {
        let calendar = HijriCalendar::with_table(MonthStartTable::parse(SAMPLE));
        // Before the first record.
        assert_eq!(calendar.to_hijri(date(2024, 3, 1)), tabular_to_hijri(date(2024, 3, 1)));
        // A month past the last record.
        assert_eq!(calendar.to_hijri(date(2024, 5, 20)), tabular_to_hijri(date(2024, 5, 20)));
    }

    #[test]
    fn test_table_loaded_once() {
        let dir = data_dir_with_table();
        let calendar = HijriCalendar::new(dir.path());
        let first = calendar.to_hijri(date(2024, 3, 15));

        fs::remove_file(dir.path().join(TABLE_RELATIVE_PATH)).unwrap();
        assert_eq!(calendar.to_hijri(date(2024, 3, 15)), first);
        assert!(calendar.strategy().is_table());
    }

    #[test]
    fn test_adjustment() {
        let calendar = HijriCalendar::with_table(MonthStartTable::parse(SAMPLE)).with_adjustment(1);
        assert_eq!(calendar.to_hijri(date(2024, 3, 11)), HijriDate::new(1445, 9, 2));

        let calendar = HijriCalendar::tabular().with_adjustment(-45);
        assert_eq!(calendar.adjustment(), -30);
    }

    #[test]
    fn test_empty_injected_table_is_tabular() {
        let calendar = HijriCalendar::with_table(MonthStartTable::default());
        assert!(!calendar.strategy().is_table());
    }
}
