//! Interactive command loop.

use std::io::{BufRead, Write};

use almuslim::{CalculationMethod, GeoLocation, Madhab};
use chrono::NaiveDate;

use crate::app::App;
use crate::config::{Language, UserConfig};
use crate::onboarding;
use crate::prompt::Prompt;
use crate::timezone;
use crate::ui::bidi;

const HELP_EN: &str = "
Commands:
  help              Show this help
  setup             Run onboarding to select city and preferences
  ask               Choose a city by name
  city <name>       Set city by name from database
  week              Show next 7 days
  detect            Try to auto-detect location (IP-based)
  coords <lat> <lon> [tz]
                    Set latitude/longitude and optional timezone
  method <name>     umm_al_qura, mwl, isna, egypt, karachi, tehran
  madhab <name>     shafi, hanafi, maliki, hanbali
  date <YYYY-MM-DD|today>
                    Show another day
  refresh|r         Redraw and update now
  quit|exit         Exit the app
";

const HELP_AR: [&str; 13] = [
    "الأوامر:",
    "  help | مساعدة     عرض هذه المساعدة",
    "  setup | إعداد     تشغيل معالج الإعداد",
    "  ask | اختيار      اختيار مدينة بالاسم",
    "  city <name> | مدينة <الاسم>  تعيين المدينة من قاعدة البيانات",
    "  week | اسبوع      عرض ٧ أيام القادمة",
    "  detect | كشف      محاولة تحديد الموقع (عن طريق IP)",
    "  coords | إحداثيات  تعيين خط العرض/الطول [/المنطقة الزمنية]",
    "  method | طريقة    طريقة الحساب",
    "  madhab | مذهب     المذهب",
    "  date | تاريخ      عرض يوم آخر",
    "  refresh | تحديث   إعادة التحديث الآن",
    "  quit | exit | خروج  إنهاء التطبيق",
];

/// A parsed REPL line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Setup,
    Ask,
    City(String),
    Week,
    Detect,
    Coords {
        location: GeoLocation,
        timezone: Option<String>,
    },
    Method(CalculationMethod),
    Madhab(Madhab),
    /// `None` returns to today.
    Date(Option<NaiveDate>),
    Refresh,
    Quit,
    /// Recognized command with bad arguments; carries the message to show.
    Usage(String),
    Unknown,
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word.to_lowercase().as_str() {
        "" | "help" | "h" | "?" | "مساعدة" => Command::Help,
        "setup" | "إعداد" => Command::Setup,
        "ask" | "اختيار" => Command::Ask,
        "city" | "مدينة" if rest.is_empty() => Command::Usage("Usage: city <name>".into()),
        "city" | "مدينة" => Command::City(rest.to_string()),
        "week" | "اسبوع" | "أسبوع" => Command::Week,
        "detect" | "كشف" => Command::Detect,
        "coords" | "إحداثيات" => parse_coords(rest),
        "method" | "طريقة" => rest
            .parse()
            .map(Command::Method)
            .unwrap_or_else(|_| Command::Usage("Usage: method <umm_al_qura|mwl|isna|egypt|karachi|tehran>".into())),
        "madhab" | "مذهب" => rest
            .parse()
            .map(Command::Madhab)
            .unwrap_or_else(|_| Command::Usage("Usage: madhab <shafi|hanafi|maliki|hanbali>".into())),
        "date" | "تاريخ" => match rest.to_lowercase().as_str() {
            "" | "today" | "اليوم" => Command::Date(None),
            other => NaiveDate::parse_from_str(other, "%Y-%m-%d")
                .map(|d| Command::Date(Some(d)))
                .unwrap_or_else(|_| Command::Usage("Usage: date <YYYY-MM-DD|today>".into())),
        },
        "refresh" | "r" | "تحديث" => Command::Refresh,
        "quit" | "exit" | "q" | "خروج" => Command::Quit,
        _ => Command::Unknown,
    }
}

fn parse_coords(args: &str) -> Command {
    const USAGE: &str = "Usage: coords <lat> <lon> [timezone]";
    let mut parts = args.split_whitespace();
    let (Some(lat), Some(lon)) = (parts.next(), parts.next()) else {
        return Command::Usage(USAGE.into());
    };
    let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        return Command::Usage(USAGE.into());
    };
    match GeoLocation::new(lat, lon) {
        Ok(location) => Command::Coords {
            location,
            timezone: parts.next().map(str::to_string),
        },
        Err(e) => Command::Usage(format!("{e}")),
    }
}

fn help(lang: Language) -> String {
    match lang {
        Language::En => HELP_EN.to_string(),
        Language::Ar => {
            let mut out = String::from("\n");
            for line in HELP_AR {
                out.push_str(&bidi(lang, line));
                out.push('\n');
            }
            out
        }
    }
}

/// `ask`: choose a city; with no match, optionally keep a custom display name.
pub fn ask<R: BufRead, W: Write>(app: &mut App, prompt: &mut Prompt<R, W>) -> anyhow::Result<()> {
    if let Some(city) = onboarding::ask_city(prompt, app.cities())? {
        app.apply_city(&city)?;
        prompt.say("Saved city to config.\n")?;
        return Ok(());
    }
    let name = prompt.ask("Type the city name to display anyway (or blank to cancel): ")?;
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        app.update(&UserConfig { city: Some(name), ..UserConfig::default() })?;
        prompt.say("Saved custom city name.\n")?;
    }
    Ok(())
}

/// `detect`: IP geolocation, snapped to the city database when the user agrees.
pub fn detect<R: BufRead, W: Write>(app: &mut App, prompt: &mut Prompt<R, W>) -> anyhow::Result<()> {
    prompt.say("Detecting approximate location via IP...\n")?;
    let info = match app.detect_location() {
        Ok(info) => info,
        Err(e) => {
            tracing::warn!(error = %e, "location detection failed");
            prompt.say(&format!("Location detection failed: {e:#}\n"))?;
            return Ok(());
        }
    };
    prompt.say(&format!("Detected: {}\n", info.display_name()))?;

    let snapped = info
        .city_query()
        .and_then(|q| app.cities().find_best_match(&q).cloned());
    let mut applied = false;
    if let Some(city) = snapped {
        prompt.say(&format!(
            "Matched to database city: {} ({:.4}, {:.4}) tz: {}\n",
            city.label(),
            city.lat,
            city.lon,
            city.tz
        ))?;
        if prompt.confirm("Use this match?", true)? {
            app.apply_city(&city)?;
            applied = true;
        }
    }
    if !applied {
        app.apply_detected(&info)?;
    }
    prompt.say("Saved location to config.\n")?;

    let custom = prompt.ask("Enter a custom city name to display (or blank to keep): ")?;
    if let Some(name) = custom.filter(|n| !n.is_empty()) {
        match app.cities().find_best_match(&name).cloned() {
            Some(city) => {
                app.apply_city(&city)?;
                prompt.say(&format!("Matched and applied: {}\n", city.label()))?;
            }
            None => app.update(&UserConfig { city: Some(name), ..UserConfig::default() })?,
        }
        prompt.say("Saved custom city.\n")?;
    }
    Ok(())
}

/// Applies one command. Returns `false` when the session should end.
pub fn execute<R: BufRead, W: Write>(
    app: &mut App,
    prompt: &mut Prompt<R, W>,
    command: Command,
) -> anyhow::Result<bool> {
    let redraw = match command {
        Command::Help => {
            prompt.say(&help(app.config().language()))?;
            false
        }
        Command::Quit => return Ok(false),
        Command::Unknown => {
            prompt.say("Unknown command. Type 'help' for options.\n")?;
            false
        }
        Command::Usage(message) => {
            prompt.say(&format!("{message}\n"))?;
            false
        }
        Command::Week => {
            prompt.say(&app.render_week())?;
            false
        }
        Command::Setup => {
            onboarding::run(app, prompt)?;
            true
        }
        Command::Ask => {
            ask(app, prompt)?;
            true
        }
        Command::Detect => {
            detect(app, prompt)?;
            true
        }
        Command::City(query) => match app.cities().find_best_match(&query).cloned() {
            Some(city) => {
                app.apply_city(&city)?;
                true
            }
            None => {
                prompt.say(&format!("Could not find a close match for '{query}'.\n"))?;
                false
            }
        },
        Command::Coords { location, timezone } => {
            if let Some(tz) = &timezone {
                if timezone::resolve_offset(tz, app.date()).is_none() {
                    prompt.say(&format!("Unrecognized timezone '{tz}', using the system offset.\n"))?;
                }
            }
            app.update(&UserConfig {
                city: Some(format!("{:.4}, {:.4}", location.lat, location.lng)),
                latitude: Some(location.lat),
                longitude: Some(location.lng),
                timezone,
                ..UserConfig::default()
            })?;
            true
        }
        Command::Method(method) => {
            app.update(&UserConfig { method: Some(method.name().to_string()), ..UserConfig::default() })?;
            true
        }
        Command::Madhab(madhab) => {
            app.update(&UserConfig { madhab: Some(madhab.name().to_string()), ..UserConfig::default() })?;
            true
        }
        Command::Date(date) => {
            app.set_date(date);
            true
        }
        Command::Refresh => true,
    };

    if redraw {
        prompt.say(&app.render())?;
    }
    Ok(true)
}

/// Reads commands until `quit` or end of input.
pub fn run<R: BufRead, W: Write>(app: &mut App, prompt: &mut Prompt<R, W>) -> anyhow::Result<()> {
    prompt.say(&help(app.config().language()))?;
    while let Some(line) = prompt.ask("\n> ")? {
        let command = parse_command(&line);
        tracing::debug!(?command, "repl command");
        if !execute(app, prompt, command)? {
            break;
        }
    }
    Ok(())
}
