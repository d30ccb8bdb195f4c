//! City database and fuzzy matching.

use std::fs;
use std::path::Path;

/// Location of the city list inside a data directory.
pub const CITIES_RELATIVE_PATH: &str = "cities.csv";

const NO_MATCH: i64 = i64::MIN;

/// Transliteration variants folded onto one spelling before matching.
const SYNONYMS: [(&str, &str); 4] = [
    ("mecca", "makkah"),
    ("medina", "madinah"),
    ("buraydah", "buraidah"),
    ("jazan", "jizan"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    /// IANA timezone name or numeric offset.
    pub tz: String,
}

impl City {
    /// Parses a `name,country,lat,lon,tz` row.
    fn parse_row(line: &str) -> Option<Self> {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let [name, country, lat, lon, tz] = fields.as_slice() else {
            return None;
        };
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            country: country.to_string(),
            lat: lat.parse().ok()?,
            lon: lon.parse().ok()?,
            tz: tz.to_string(),
        })
    }

    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CityDb {
    cities: Vec<City>,
}

impl CityDb {
    /// Parses CSV text. A leading BOM, a header row, `#` comments and
    /// malformed rows are skipped.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text.lines().peekable();
        if let Some(first) = lines.peek() {
            let lower = first.to_lowercase();
            if lower.contains("name") && lower.contains("lat") {
                lines.next();
            }
        }

        let mut skipped = 0usize;
        let cities = lines
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter_map(|l| {
                let city = City::parse_row(l);
                if city.is_none() {
                    skipped += 1;
                }
                city
            })
            .collect();

        if skipped > 0 {
            tracing::warn!(skipped, "ignored malformed city rows");
        }
        Self { cities }
    }

    /// Loads `cities.csv` from `data_dir`; a missing file yields an empty database.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(CITIES_RELATIVE_PATH);
        match fs::read_to_string(&path) {
            Ok(text) => {
                let db = Self::parse(&text);
                tracing::debug!(count = db.len(), path = %path.display(), "loaded city database");
                db
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "city database unavailable");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Best match for free text such as "mecca" or "Cairo, Egypt".
    ///
    /// An exact normalized match on the name or "name, country" wins;
    /// otherwise the highest composite score, if it is not negative.
    pub fn find_best_match(&self, query: &str) -> Option<&City> {
        let needle = normalize(query);
        if needle.is_empty() {
            return None;
        }

        if let Some(city) = self
            .cities
            .iter()
            .find(|c| normalize(&c.name) == needle || normalize(&c.label()) == needle)
        {
            return Some(city);
        }

        let (best, score) = self
            .cities
            .iter()
            .map(|c| (c, score_match(&normalize(&c.label()), &needle)))
            .fold((None, NO_MATCH), |acc, (c, s)| if s > acc.1 { (Some(c), s) } else { acc });

        if score < 0 { None } else { best }
    }
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Lowercases, folds common accents, drops punctuation, collapses
/// whitespace and applies transliteration synonyms on word boundaries.
pub fn normalize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = true;
    for c in s.chars().flat_map(char::to_lowercase).map(fold_accent) {
        if c.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else if c.is_alphanumeric() || c == ',' {
            out.push(c);
            prev_space = false;
        }
    }
    let trimmed = out.trim_end();

    trimmed
        .split(' ')
        .map(|word| {
            let (core, comma) = match word.strip_suffix(',') {
                Some(core) => (core, ","),
                None => (word, ""),
            };
            let core = SYNONYMS
                .iter()
                .find(|(from, _)| *from == core)
                .map_or(core, |(_, to)| *to);
            format!("{core}{comma}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Edit distance over characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Composite of substring proximity and Levenshtein similarity; higher is better.
fn score_match(hay: &str, needle: &str) -> i64 {
    let hay_len = hay.chars().count() as i64;
    let needle_len = needle.chars().count() as i64;
    let len_diff = (hay_len - needle_len).abs();

    let substring = hay.find(needle).map_or(NO_MATCH, |byte_pos| {
        let pos = hay[..byte_pos].chars().count() as i64;
        (200 - pos).max(0) + (100 - len_diff).max(0)
    });
    let fuzzy = 300 - levenshtein(hay, needle) as i64 * 20 - len_diff;
    substring.max(fuzzy)
}
