use serde::{Deserialize, Serialize};
use std::fmt;

/// The five daily prayers plus sunrise, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name_en(&self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    pub fn name_ar(&self) -> &'static str {
        match self {
            Prayer::Fajr => "الفجر",
            Prayer::Sunrise => "الشروق",
            Prayer::Dhuhr => "الظهر",
            Prayer::Asr => "العصر",
            Prayer::Maghrib => "المغرب",
            Prayer::Isha => "العشاء",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name_en())
    }
}

/// Prayer times for one date, as fractional hours of local civil time.
///
/// Values are not normalized: Isha may exceed 24 and Fajr may be negative
/// when they fall on the neighbouring calendar day. Normalize when formatting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrayerTimes {
    pub fajr: f64,
    pub sunrise: f64,
    pub dhuhr: f64,
    pub asr: f64,
    pub maghrib: f64,
    pub isha: f64,
}

impl PrayerTimes {
    pub fn get(&self, prayer: Prayer) -> f64 {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// All six times in chronological order.
    pub fn entries(&self) -> [(Prayer, f64); 6] {
        Prayer::ALL.map(|p| (p, self.get(p)))
    }

    /// Hours between sunrise and sunset.
    pub fn day_length(&self) -> f64 {
        let len = self.maghrib - self.sunrise;
        if len < 0.0 { len + 24.0 } else { len }
    }

    /// The first prayer at or after `now_hours`, with the hours remaining.
    ///
    /// After Isha this wraps to tomorrow's Fajr (approximated by today's).
    pub fn next_after(&self, now_hours: f64) -> (Prayer, f64) {
        for (prayer, at) in self.entries() {
            let remaining = at - now_hours;
            if remaining >= -0.0001 {
                return (prayer, remaining);
            }
        }
        (Prayer::Fajr, (24.0 - now_hours) + self.fajr)
    }

    /// Elapsed fraction of the interval between the previous and the next prayer.
    pub fn progress(&self, now_hours: f64) -> f64 {
        let (next, _) = self.next_after(now_hours);
        let idx = next as usize;
        let prev_idx = if idx == 0 { Prayer::ALL.len() - 1 } else { idx - 1 };

        let prev_t = self.get(Prayer::ALL[prev_idx]);
        let mut next_t = self.get(next);
        let mut now = now_hours;
        if now < prev_t {
            now += 24.0;
        }
        if next_t < prev_t {
            next_t += 24.0;
        }
        ((now - prev_t) / (next_t - prev_t).max(0.001)).clamp(0.0, 1.0)
    }
}

/// A date in the Islamic lunar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HijriDate {
    /// Year AH.
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// 1..=30
    pub day: u32,
}

impl HijriDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}
