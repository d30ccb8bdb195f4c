//! Umm al-Qura month-start table.

use std::fs;
use std::path::Path;

use almuslim_types::{AlmuslimError, HijriDate};
use chrono::NaiveDate;

/// Location of the table inside a data directory.
pub const TABLE_RELATIVE_PATH: &str = "hijri/umm_al_qura_month_starts.csv";

/// Longest possible Hijri month.
const MAX_MONTH_DAYS: i64 = 30;

/// The Gregorian date on which a Hijri month begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthStartRecord {
    pub hijri_year: i32,
    pub hijri_month: u32,
    pub gregorian: NaiveDate,
}

impl MonthStartRecord {
    /// Parses one `hijri_year,hijri_month,gregorian_year,gregorian_month,gregorian_day` row.
    fn parse_row(line: &str) -> Option<Self> {
        let mut fields = line.split(',').map(str::trim);
        let hijri_year = fields.next()?.parse().ok()?;
        let hijri_month: u32 = fields.next()?.parse().ok()?;
        let year = fields.next()?.parse().ok()?;
        let month = fields.next()?.parse().ok()?;
        let day = fields.next()?.parse().ok()?;

        if !(1..=12).contains(&hijri_month) {
            return None;
        }
        let gregorian = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self { hijri_year, hijri_month, gregorian })
    }
}

/// Month-start records sorted ascending by Gregorian date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthStartTable {
    records: Vec<MonthStartRecord>,
}

impl MonthStartTable {
    /// Parses table text. The first line is a header; malformed rows are skipped.
    pub fn parse(text: &str) -> Self {
        let mut skipped = 0usize;
        let mut records: Vec<MonthStartRecord> = text
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| {
                let record = MonthStartRecord::parse_row(line);
                if record.is_none() {
                    skipped += 1;
                }
                record
            })
            .collect();

        if skipped > 0 {
            log::warn!("skipped {skipped} malformed month-start rows");
        }
        records.sort_by_key(|r| r.gregorian);
        Self { records }
    }

    /// Reads and parses the table at `path`.
    ///
    /// # Errors
    /// Returns `AlmuslimError::TableLoad` if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AlmuslimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| AlmuslimError::TableLoad(format!("{}: {e}", path.display())))?;
        let table = Self::parse(&text);
        log::debug!("loaded {} month starts from {}", table.len(), path.display());
        Ok(table)
    }

    /// Like [`from_path`](Self::from_path), but a missing or unreadable file yields an empty table.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        Self::from_path(path).unwrap_or_else(|e| {
            log::warn!("Hijri table unavailable, using arithmetic calendar: {e}");
            Self::default()
        })
    }

    /// Loads `hijri/umm_al_qura_month_starts.csv` under `data_dir`.
    pub fn load_from_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::load_or_empty(data_dir.as_ref().join(TABLE_RELATIVE_PATH))
    }

    pub fn records(&self) -> &[MonthStartRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hijri date for `date`, or `None` when the table does not cover it.
    ///
    /// Uses the latest record starting on or before `date`. Dates before the
    /// first record, or a full month past the start of the last one, are
    /// uncovered.
    pub fn lookup(&self, date: NaiveDate) -> Option<HijriDate> {
        let idx = self.records.partition_point(|r| r.gregorian <= date);
        let record = self.records.get(idx.checked_sub(1)?)?;
        let delta = (date - record.gregorian).num_days();

        if idx == self.records.len() && delta >= MAX_MONTH_DAYS {
            return None;
        }
        let day = (delta + 1).clamp(1, MAX_MONTH_DAYS) as u32;
        Some(HijriDate::new(record.hijri_year, record.hijri_month, day))
    }

    /// Gregorian span covered by the table.
    pub fn coverage(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some((first.gregorian, last.gregorian + chrono::Duration::days(MAX_MONTH_DAYS - 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
hijri_year,hijri_month,gregorian_year,gregorian_month,gregorian_day
1445,10,2024,4,10
1445,9,2024,3,11
not,a,row
1445,11,2024,5
1445,13,2024,6,1
1445,12,2024,2,30

1445,11,2024,5,9
";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_skips_malformed_and_sorts() {
        let table = MonthStartTable::parse(SAMPLE);
        assert_eq!(table.len(), 3);
        let months: Vec<u32> = table.records().iter().map(|r| r.hijri_month).collect();
        assert_eq!(months, vec![9, 10, 11]);
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(MonthStartTable::parse(SAMPLE), MonthStartTable::parse(SAMPLE));
    }

    #[test]
    fn test_header_only_is_empty() {
        let table = MonthStartTable::parse("hijri_year,hijri_month,gregorian_year,gregorian_month,gregorian_day\n");
        assert!(table.is_empty());
        assert_eq!(table.lookup(date(2024, 3, 11)), None);
        assert_eq!(table.coverage(), None);
    }

    #[test]
    fn test_lookup_start_date_is_day_one() {
        let table = MonthStartTable::parse(SAMPLE);
        assert_eq!(table.lookup(date(2024, 3, 11)), Some(HijriDate::new(1445, 9, 1)));
        assert_eq!(table.lookup(date(2024, 4, 10)), Some(HijriDate::new(1445, 10, 1)));
    }

    #[test]
    fn test_lookup_inside_month() {
        let table = MonthStartTable::parse(SAMPLE);
        assert_eq!(table.lookup(date(2024, 3, 20)), Some(HijriDate::new(1445, 9, 10)));
        assert_eq!(table.lookup(date(2024, 4, 9)), Some(HijriDate::new(1445, 9, 30)));
    }

    #[test]
    fn test_lookup_before_first_record() {
        let table = MonthStartTable::parse(SAMPLE);
        assert_eq!(table.lookup(date(2024, 3, 10)), None);
    }

    #[test]
    fn test_lookup_past_coverage() {
        let table = MonthStartTable::parse(SAMPLE);
        // Last record starts 2024-05-09.
        assert_eq!(table.lookup(date(2024, 6, 7)), Some(HijriDate::new(1445, 11, 30)));
        assert_eq!(table.lookup(date(2024, 6, 8)), None);
        assert_eq!(table.coverage(), Some((date(2024, 3, 11), date(2024, 6, 7))));
    }

    #[test]
    fn test_interior_gap_clamps_day() {
        let text = "h\n1445,1,2023,7,19\n1445,3,2023,9,16\n";
        let table = MonthStartTable::parse(text);
        // Safar row is missing; Muharram is stretched but clamped.
        assert_eq!(table.lookup(date(2023, 9, 10)), Some(HijriDate::new(1445, 1, 30)));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = MonthStartTable::from_path(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, AlmuslimError::TableLoad(_)));
        assert!(MonthStartTable::load_or_empty(dir.path().join("nope.csv")).is_empty());
    }

    #[test]
    fn test_load_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("hijri")).unwrap();
        let mut file = fs::File::create(dir.path().join(TABLE_RELATIVE_PATH)).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let first = MonthStartTable::load_from_data_dir(dir.path());
        let second = MonthStartTable::load_from_data_dir(dir.path());
        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }
}
