//! Terminal rendering: themes, the boxed prayer table and the day/week views.
//!
//! Everything renders into a `String` so screens can be tested without a
//! terminal; the caller decides where to write them.

use std::fmt::Write as _;

use almuslim::{
    AlmuslimError, CalculationConfig, GeoLocation, HijriDate, HijriDateExt, Prayer, PrayerTimes,
    format_clock, format_duration, to_arabic_digits,
};
use chrono::NaiveDate;

use crate::config::Language;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const CLEAR: &str = "\x1b[2J\x1b[H";

const HEADER_FG_DARK: u8 = 45;
const HEADER_FG_LIGHT: u8 = 25;
const HIGHLIGHT_FG: u8 = 82;

const MAX_NAME_WIDTH: usize = 16;
const MIN_TIME_WIDTH: usize = 5;
const PROGRESS_WIDTH: usize = 30;

/// Right-to-left embedding and pop directional formatting.
const RLE: char = '\u{202B}';
const PDF: char = '\u{202C}';

const BANNER: [&str; 5] = [
    "   ○○○○○   ○○○○   ○○○○○    Almuslim",
    "  ○      ○   ○   ○      ○   Fast Terminal Prayer Times",
    "  ○   ◐   ○   ○   ○   ★  ○",
    "  ○      ○   ○   ○      ○",
    "   ○○○○○     ○     ○○○○○",
];

/// Maps a color name or 0-255 index onto the 256-color palette.
pub fn parse_color(name: &str) -> Option<u8> {
    let name = name.trim().to_ascii_lowercase();
    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
        return name.parse().ok();
    }
    Some(match name.as_str() {
        "black" => 16,
        "white" => 231,
        "gray" | "grey" => 244,
        "red" => 196,
        "green" => 34,
        "blue" => 27,
        "purple" | "magenta" => 129,
        "teal" | "cyan" => 37,
        "orange" => 208,
        "yellow" => 226,
        "dark" => 235,
        "light" => 255,
        _ => return None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub color: bool,
    pub dark: bool,
    pub fg: Option<u8>,
    pub bg: Option<u8>,
}

impl Default for Theme {
    fn default() -> Self {
        Self { color: true, dark: true, fg: None, bg: None }
    }
}

impl Theme {
    /// No escape sequences at all.
    pub fn plain() -> Self {
        Self { color: false, ..Self::default() }
    }

    /// Builds a theme from the `colors`, `fg` and `bg` settings.
    ///
    /// A background without a foreground gets white or black text for contrast.
    pub fn resolve(colors: Option<&str>, fg: Option<&str>, bg: Option<&str>) -> Self {
        let mut theme = match colors.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("none" | "off") => Self::plain(),
            Some("light") => Self { dark: false, ..Self::default() },
            _ => Self::default(),
        };
        theme.fg = fg.and_then(parse_color);
        theme.bg = bg.and_then(parse_color);
        if let (Some(bg), None) = (theme.bg, theme.fg) {
            theme.fg = Some(if bg < 100 { 231 } else { 16 });
        }
        theme
    }

    fn code<'a>(&self, sgr: &'a str) -> &'a str {
        if self.color { sgr } else { "" }
    }

    /// Escape sequences re-establishing the base foreground and background.
    pub fn base(&self) -> String {
        if !self.color {
            return String::new();
        }
        let mut s = String::new();
        if let Some(bg) = self.bg {
            let _ = write!(s, "\x1b[48;5;{bg}m");
        }
        if let Some(fg) = self.fg {
            let _ = write!(s, "\x1b[38;5;{fg}m");
        }
        s
    }

    /// Reset to the base colors.
    fn restore(&self) -> String {
        if self.color { format!("{RESET}{}", self.base()) } else { String::new() }
    }

    fn fg(&self, index: u8) -> String {
        if self.color { format!("\x1b[38;5;{index}m") } else { String::new() }
    }

    /// `text` in the given style, followed by the base colors.
    pub fn paint(&self, sgr: &str, text: &str) -> String {
        format!("{}{text}{}", self.code(sgr), self.restore())
    }

    pub fn clear_screen(&self) -> String {
        format!("{}{}", self.code(CLEAR), self.base())
    }

    /// Resets all attributes; emitted once a screen is finished.
    pub fn finish(&self) -> &'static str {
        self.code(RESET)
    }
}

/// Wraps `s` in a right-to-left embedding when `lang` is Arabic.
pub fn bidi(lang: Language, s: &str) -> String {
    if lang.is_rtl() { format!("{RLE}{s}{PDF}") } else { s.to_string() }
}

fn digits(lang: Language, s: &str) -> String {
    match lang {
        Language::Ar => to_arabic_digits(s),
        Language::En => s.to_string(),
    }
}

/// English or Arabic text for a UI label.
pub fn label(lang: Language, en: &'static str) -> &'static str {
    if lang == Language::En {
        return en;
    }
    match en {
        "City" => "المدينة",
        "Method" => "الطريقة",
        "Prayer" => "الصلاة",
        "Time" => "الوقت",
        "Day length" => "طول النهار",
        "Next" => "التالي",
        "in" => "بعد",
        "Next 7 days" => "الأيام السبعة القادمة",
        other => other,
    }
}

pub fn prayer_name(lang: Language, prayer: Prayer) -> &'static str {
    match lang {
        Language::En => prayer.name_en(),
        Language::Ar => prayer.name_ar(),
    }
}

/// Boxed two-column table. `highlight` marks one data row.
pub fn boxed_table(theme: &Theme, lang: Language, rows: &[(String, String)], highlight: Option<usize>) -> String {
    let lw = rows
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_NAME_WIDTH);
    let rw = rows
        .iter()
        .map(|(_, r)| r.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_TIME_WIDTH);

    let rule = |left: char, mid: char, right: char| {
        let line = format!("{left}{}{mid}{}{right}", "─".repeat(lw + 2), "─".repeat(rw + 2));
        format!("{}\n", theme.paint(GRAY, &line))
    };
    let bar = theme.paint(GRAY, "│");
    let cell = |text: &str, width: usize| {
        if lang.is_rtl() { format!("{text:>width$}") } else { format!("{text:<width$}") }
    };

    let mut out = String::new();
    out.push_str(&rule('┌', '┬', '┐'));

    let header_fg = if theme.dark { HEADER_FG_DARK } else { HEADER_FG_LIGHT };
    let header_style = format!("{}{}", theme.code(BOLD), theme.fg(header_fg));
    let _ = writeln!(
        out,
        "{bar} {}{}{} {bar} {}{}{} {bar}",
        header_style,
        cell(label(lang, "Prayer"), lw),
        theme.restore(),
        header_style,
        cell(label(lang, "Time"), rw),
        theme.restore(),
    );
    out.push_str(&rule('├', '┼', '┤'));

    let highlight_style = format!("{}{}", theme.code(BOLD), theme.fg(HIGHLIGHT_FG));
    for (i, (name, time)) in rows.iter().enumerate() {
        let (pre, post) = if highlight == Some(i) {
            (highlight_style.as_str(), theme.restore())
        } else {
            ("", String::new())
        };
        let _ = writeln!(
            out,
            "{bar} {pre}{}{post} {bar} {pre}{}{post} {bar}",
            cell(name, lw),
            cell(time, rw),
        );
    }
    out.push_str(&rule('└', '┴', '┘'));
    out
}

/// `[#####-----]` with `fraction` of `width` filled.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (fraction * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Everything the day screen shows.
pub struct DayView<'a> {
    /// Local time of day in hours, when `date` is today.
    pub now_hours: Option<f64>,
    /// "YYYY-MM-DD HH:MM" stamp for the header.
    pub timestamp: String,
    pub config_path: &'a str,
    pub config_found: bool,
    pub city: &'a str,
    pub location: GeoLocation,
    pub timezone: Option<&'a str>,
    pub calculation: CalculationConfig,
    pub hijri: HijriDate,
    pub times: &'a Result<PrayerTimes, AlmuslimError>,
    pub use_24h: bool,
}

pub struct Screen {
    pub theme: Theme,
    pub lang: Language,
}

impl Screen {
    pub fn new(theme: Theme, lang: Language) -> Self {
        Self { theme, lang }
    }

    fn line(&self, out: &mut String, text: &str) {
        out.push_str(&bidi(self.lang, text));
        out.push('\n');
    }

    pub fn banner(&self) -> String {
        let mut out = self.theme.clear_screen();
        for line in BANNER {
            out.push_str(&self.theme.paint(GREEN, line));
            out.push('\n');
        }
        out
    }

    pub fn hijri_line(&self, hijri: &HijriDate) -> String {
        let text = match self.lang {
            Language::En => hijri.display_en(),
            Language::Ar => hijri.display_ar(),
        };
        self.theme.paint(CYAN, &bidi(self.lang, &text))
    }

    pub fn render_day(&self, view: &DayView<'_>) -> String {
        let lang = self.lang;
        let theme = &self.theme;
        let mut out = self.banner();

        let _ = writeln!(out, "Date/Time (local): {}", view.timestamp);
        let _ = writeln!(
            out,
            "Config: {} ({})",
            view.config_path,
            if view.config_found { "found" } else { "missing" }
        );
        let rule = view
            .calculation
            .high_latitude_rule
            .map_or("none", |r| r.name());
        let _ = writeln!(
            out,
            "Lat: {:.4}  Lon: {:.4}  TZ: {}  High-latitude: {}",
            view.location.lat,
            view.location.lng,
            view.timezone.unwrap_or("system"),
            rule,
        );

        out.push('\n');
        out.push_str(&self.hijri_line(&view.hijri));
        out.push_str("\n\n");

        let summary = format!(
            "{}{}: {}{}  {}{}: {}{} ({})",
            theme.code(DIM),
            label(lang, "City"),
            theme.restore(),
            view.city,
            theme.code(DIM),
            label(lang, "Method"),
            theme.restore(),
            view.calculation.method,
            view.calculation.madhab,
        );
        self.line(&mut out, &summary);

        let times = match view.times {
            Ok(times) => times,
            Err(e) => {
                let _ = writeln!(out, "\nUnable to compute prayer times for this location and date: {e}");
                out.push_str(theme.finish());
                return out;
            }
        };

        let rows: Vec<(String, String)> = times
            .entries()
            .iter()
            .map(|(p, at)| {
                (
                    prayer_name(lang, *p).to_string(),
                    digits(lang, &format_clock(*at, view.use_24h)),
                )
            })
            .collect();
        let next = view.now_hours.map(|now| times.next_after(now));
        out.push_str(&boxed_table(theme, lang, &rows, next.map(|(p, _)| p as usize)));

        let day_length = format!(
            "{}: {}",
            label(lang, "Day length"),
            digits(lang, &format_duration(times.day_length()))
        );
        self.line(&mut out, &day_length);

        if let (Some(now), Some((prayer, remaining))) = (view.now_hours, next) {
            let countdown = format!(
                "{} ({}) {}: {}",
                label(lang, "Next"),
                prayer_name(lang, prayer),
                label(lang, "in"),
                digits(lang, &format_duration(remaining)),
            );
            out.push('\n');
            out.push_str(&bidi(lang, &countdown));
            out.push_str("  ");
            out.push_str(&theme.paint(DIM, &progress_bar(times.progress(now), PROGRESS_WIDTH)));
            out.push('\n');
        }

        out.push_str("\nTip: type 'help' for commands.\n");
        out.push_str(theme.finish());
        out
    }

    /// One line per day: `YYYY-MM-DD | Fajr: .., Dhuhr: .., ...`.
    pub fn render_week<I>(&self, days: I, use_24h: bool) -> String
    where
        I: IntoIterator<Item = (NaiveDate, Result<PrayerTimes, AlmuslimError>)>,
    {
        let lang = self.lang;
        let dashes = "-".repeat(60);
        let mut out = String::new();
        let _ = writeln!(out, "\n{}:", label(lang, "Next 7 days"));
        let _ = writeln!(out, "{dashes}");

        for (date, result) in days {
            let date_str = date.format("%Y-%m-%d").to_string();
            let body = match result {
                Ok(times) => [Prayer::Fajr, Prayer::Dhuhr, Prayer::Asr, Prayer::Maghrib, Prayer::Isha]
                    .iter()
                    .map(|p| {
                        format!(
                            "{}: {}",
                            prayer_name(lang, *p),
                            digits(lang, &format_clock(times.get(*p), use_24h))
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
                Err(e) => format!("unavailable ({e})"),
            };
            self.line(&mut out, &format!("{} | {body}", digits(lang, &date_str)));
        }
        let _ = writeln!(out, "{dashes}");
        out
    }
}
