//! First-run setup wizard.

use std::io::{self, BufRead, Write};

use almuslim::{CalculationMethod, HighLatitudeRule, Madhab};

use crate::app::App;
use crate::cities::{City, CityDb};
use crate::config::{Language, UserConfig};
use crate::prompt::Prompt;
use crate::ui::Theme;

const METHOD_CHOICES: &str = "umm_al_qura|mwl|isna|egypt|karachi|tehran";

/// Asks for a city in free text and resolves it against `db`.
///
/// Returns `None` when the user cancels or nothing matches.
pub fn ask_city<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, db: &CityDb) -> io::Result<Option<City>> {
    if db.is_empty() {
        return Ok(None);
    }
    let Some(input) = prompt.ask("\nType your city (e.g., Riyadh or Riyadh, Saudi Arabia). Type 'q' to cancel.\n> ")? else {
        return Ok(None);
    };
    if matches!(input.to_lowercase().as_str(), "" | "q" | "quit" | "exit") {
        return Ok(None);
    }

    match db.find_best_match(&input) {
        Some(city) => {
            prompt.say(&format!(
                "Using: {}  ({:.4}, {:.4}) tz: {}\n",
                city.label(),
                city.lat,
                city.lon,
                city.tz
            ))?;
            Ok(Some(city.clone()))
        }
        None => {
            prompt.say(&format!("Could not find a close match for '{input}'.\n"))?;
            Ok(None)
        }
    }
}

fn ask_choice<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    question: &str,
    default: &str,
) -> io::Result<String> {
    let answer = prompt.ask(&format!("{question} (default {default}): "))?;
    Ok(answer.filter(|a| !a.is_empty()).unwrap_or_else(|| default.to_string()))
}

/// Runs the wizard and saves the answers. Returns `false` if cancelled.
pub fn run<R: BufRead, W: Write>(app: &mut App, prompt: &mut Prompt<R, W>) -> anyhow::Result<bool> {
    let theme = if app.screen().theme.color {
        Theme::resolve(Some("dark"), Some("231"), Some("23"))
    } else {
        Theme::plain()
    };
    prompt.say(&theme.clear_screen())?;
    prompt.say(&format!("{}\n\n", theme.paint("\x1b[1m", "\n\n    Welcome to Almuslim")))?;
    prompt.say("This wizard will help you set up your city and preferences.\n")?;
    if prompt.ask("Press Enter to start...")?.is_none() {
        prompt.say(theme.finish())?;
        return Ok(false);
    }

    if app.cities().is_empty() {
        prompt.say(&format!(
            "No cities database found in {}. Use 'coords <lat> <lon> [timezone]' instead.\n",
            app.data_dir().display()
        ))?;
        prompt.say(theme.finish())?;
        return Ok(false);
    }
    let Some(city) = ask_city(prompt, app.cities())? else {
        prompt.say(&format!("Setup cancelled.\n{}", theme.finish()))?;
        return Ok(false);
    };

    let language = ask_choice(prompt, "\nLanguage? [en/ar]", "en")?;
    let language = Language::from_name(&language);
    let use_24h = prompt.confirm("24-hour clock?", true)?;

    let method = ask_choice(prompt, &format!("\nCalculation method? [{METHOD_CHOICES}]"), "umm_al_qura")?;
    let method = method.parse::<CalculationMethod>().unwrap_or_else(|_| {
        tracing::warn!(%method, "unknown method, keeping umm_al_qura");
        CalculationMethod::UmmAlQura
    });
    let madhab = ask_choice(prompt, "Madhab? [shafi|hanafi]", "shafi")?;
    let madhab = Madhab::from_name_lossy(&madhab);

    let bg = prompt
        .ask("\nPick a background color (name or 0-255), examples: dark, blue, green, purple, teal, orange, none\n> ")?
        .filter(|b| !b.is_empty() && !matches!(b.to_lowercase().as_str(), "none" | "off"));

    app.apply_city(&city)?;
    app.update(&UserConfig {
        method: Some(method.name().to_string()),
        madhab: Some(madhab.name().to_string()),
        high_latitude_rule: Some(HighLatitudeRule::MiddleOfTheNight.name().to_string()),
        use_24h: Some(use_24h),
        language: Some(language.code().to_string()),
        bg,
        ..UserConfig::default()
    })?;

    prompt.say(&format!(
        "\nSaved config to: {}\n\n{}",
        app.store().path().display(),
        theme.finish()
    ))?;
    Ok(true)
}
