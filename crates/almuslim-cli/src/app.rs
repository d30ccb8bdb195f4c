//! Session state: configuration, data files and the current view.

use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use almuslim::network::LocationInfo;
use almuslim::{HijriCalendar, PrayerDateExt, TABLE_RELATIVE_PATH, write_schedule_csv};
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::cities::{CITIES_RELATIVE_PATH, City, CityDb};
use crate::config::{ConfigStore, UserConfig};
use crate::timezone;
use crate::ui::{DayView, Screen, Theme};

#[cfg(not(windows))]
const SYSTEM_DATA_DIR: &str = "/usr/share/almuslim/data";

fn has_data(dir: &Path) -> bool {
    dir.join(CITIES_RELATIVE_PATH).is_file() || dir.join(TABLE_RELATIVE_PATH).is_file()
}

/// Picks the data directory: `explicit`, else `<exe dir>/data`, else the
/// system share directory, else the workspace `data/`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }

    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
    let mut candidates = Vec::new();
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        candidates.push(exe_dir.join("data"));
    }
    #[cfg(not(windows))]
    candidates.push(PathBuf::from(SYSTEM_DATA_DIR));

    first_with_data(candidates).unwrap_or(workspace)
}

fn first_with_data(candidates: Vec<PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|dir| has_data(dir))
}

pub struct App {
    store: ConfigStore,
    config: UserConfig,
    data_dir: PathBuf,
    cities: CityDb,
    calendar: HijriCalendar,
    date: Option<NaiveDate>,
}

impl App {
    /// Loads the configuration (if any) and the city database.
    pub fn new(store: ConfigStore, data_dir: PathBuf, date: Option<NaiveDate>) -> anyhow::Result<Self> {
        let config = store.load()?.unwrap_or_default();
        let cities = CityDb::load(&data_dir);
        let calendar = HijriCalendar::new(&data_dir).with_adjustment(config.hijri_adjustment());
        tracing::debug!(data_dir = %data_dir.display(), cities = cities.len(), "session ready");
        Ok(Self { store, config, data_dir, cities, calendar, date })
    }

    pub fn config(&self) -> &UserConfig {
        &self.config
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn cities(&self) -> &CityDb {
        &self.cities
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn screen(&self) -> Screen {
        let theme = Theme::resolve(
            self.config.colors.as_deref(),
            self.config.fg.as_deref(),
            self.config.bg.as_deref(),
        );
        Screen::new(theme, self.config.language())
    }

    /// Wall-clock time at the configured timezone.
    pub fn now(&self) -> NaiveDateTime {
        timezone::now_in(self.config.timezone.as_deref())
    }

    /// The `--date`/`date` override, else today.
    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| self.now().date())
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    /// Persists `changes` and reloads the merged configuration.
    pub fn update(&mut self, changes: &UserConfig) -> anyhow::Result<()> {
        let adjustment = self.config.hijri_adjustment();
        self.config = self.store.update(changes)?;
        if self.config.hijri_adjustment() != adjustment {
            self.calendar = HijriCalendar::new(&self.data_dir).with_adjustment(self.config.hijri_adjustment());
        }
        Ok(())
    }

    /// Saves a database city as the current location.
    pub fn apply_city(&mut self, city: &City) -> anyhow::Result<()> {
        self.update(&UserConfig {
            city: Some(city.label()),
            latitude: Some(city.lat),
            longitude: Some(city.lon),
            timezone: Some(city.tz.clone()),
            ..UserConfig::default()
        })
    }

    /// Saves raw geolocation results as the current location.
    pub fn apply_detected(&mut self, info: &LocationInfo) -> anyhow::Result<()> {
        self.update(&UserConfig {
            city: info.city_query(),
            latitude: Some(info.coords.lat),
            longitude: Some(info.coords.lng),
            timezone: info.timezone_or_fallback(),
            ..UserConfig::default()
        })
    }

    pub fn detect_location(&self) -> anyhow::Result<LocationInfo> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        Ok(runtime.block_on(almuslim::network::detect_location())?)
    }

    /// The day screen for the selected date.
    pub fn render(&self) -> String {
        let screen = self.screen();
        let Some(location) = self.config.location() else {
            return format!(
                "{}No location configured. Type 'setup', 'city <name>', 'coords <lat> <lon>' or 'detect'.\n",
                screen.banner()
            );
        };

        let now = self.now();
        let date = self.date();
        let calculation = self.config.calculation_config(date);
        let times = date.prayer_times(location, &calculation);
        let now_hours = (date == now.date())
            .then(|| now.hour() as f64 + now.minute() as f64 / 60.0 + now.second() as f64 / 3600.0);
        let config_path = self.store.path().display().to_string();

        let view = DayView {
            now_hours,
            timestamp: now.format("%Y-%m-%d %H:%M").to_string(),
            config_path: &config_path,
            config_found: self.store.exists(),
            city: self.config.city.as_deref().unwrap_or("(unset)"),
            location,
            timezone: self.config.timezone.as_deref(),
            calculation,
            hijri: date.hijri(&self.calendar),
            times: &times,
            use_24h: self.config.use_24h(),
        };
        screen.render_day(&view)
    }

    /// Seven days from the selected date.
    pub fn render_week(&self) -> String {
        let Some(location) = self.config.location() else {
            return "No location configured.\n".to_string();
        };
        let date = self.date();
        let week = date.prayer_week(location, self.config.calculation_config(date));
        self.screen().render_week(week, self.config.use_24h())
    }

    /// Writes the seven-day schedule as CSV; returns the number of rows.
    pub fn export_week_csv(&self, path: &Path) -> anyhow::Result<usize> {
        let location = self
            .config
            .location()
            .context("no location configured")?;
        let date = self.date();
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let rows = write_schedule_csv(
            BufWriter::new(file),
            date.prayer_week(location, self.config.calculation_config(date)),
        )
        .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(rows, path = %path.display(), "weekly schedule exported");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CITIES: &str = "name,country,lat,lon,tz
Makkah,Saudi Arabia,21.4225,39.8262,Asia/Riyadh
Cairo,Egypt,30.0444,31.2357,Africa/Cairo
";

    fn app_in(dir: &Path) -> App {
        fs::write(dir.join(CITIES_RELATIVE_PATH), CITIES).unwrap();
        let store = ConfigStore::new(dir.join("config.toml"));
        App::new(store, dir.to_path_buf(), NaiveDate::from_ymd_opt(2024, 3, 20)).unwrap()
    }

    #[test]
    fn test_first_with_data() {
        let empty = tempfile::tempdir().unwrap();
        let full = tempfile::tempdir().unwrap();
        fs::write(full.path().join(CITIES_RELATIVE_PATH), CITIES).unwrap();

        let found = first_with_data(vec![empty.path().to_path_buf(), full.path().to_path_buf()]);
        assert_eq!(found.as_deref(), Some(full.path()));
        assert_eq!(first_with_data(vec![empty.path().to_path_buf()]), None);
        assert_eq!(resolve_data_dir(Some(empty.path().to_path_buf())), empty.path());
    }

    #[test]
    fn test_unconfigured_render() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path());
        assert!(app.config().location().is_none());
        assert!(app.render().contains("No location configured"));
        assert!(app.export_week_csv(&dir.path().join("week.csv")).is_err());
    }

    #[test]
    fn test_apply_city_persists_and_renders() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let city = app.cities().find_best_match("mecca").cloned().unwrap();
        app.apply_city(&city).unwrap();

        assert!(app.store().exists());
        assert_eq!(app.config().city.as_deref(), Some("Makkah, Saudi Arabia"));
        let screen = app.render();
        assert!(screen.contains("Makkah, Saudi Arabia"));
        assert!(screen.contains("05:09"));
    }

    #[test]
    fn test_week_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        let city = app.cities().find_best_match("Makkah").cloned().unwrap();
        app.apply_city(&city).unwrap();

        let path = dir.path().join("week.csv");
        assert_eq!(app.export_week_csv(&path).unwrap(), 7);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 8);
        assert!(text.lines().nth(1).unwrap().starts_with("2024-03-20,05:09"));
        assert_eq!(app.render_week().matches(" | ").count(), 7);
    }

    #[test]
    fn test_update_rebuilds_calendar_on_adjustment() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.update(&UserConfig { hijri_adjustment: Some(2), ..UserConfig::default() }).unwrap();
        assert_eq!(app.calendar.adjustment(), 2);
    }
}
