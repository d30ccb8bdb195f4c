use almuslim_types::HijriDate;

const MONTHS_EN: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' I",
    "Rabi' II",
    "Jumada I",
    "Jumada II",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhul-Qa'dah",
    "Dhul-Hijjah",
];

const MONTHS_AR: [&str; 12] = [
    "محرم",
    "صفر",
    "ربيع الأول",
    "ربيع الآخر",
    "جمادى الأولى",
    "جمادى الآخرة",
    "رجب",
    "شعبان",
    "رمضان",
    "شوال",
    "ذو القعدة",
    "ذو الحجة",
];

/// Transliterated month name; empty for months outside 1..=12.
pub fn month_name_en(month: u32) -> &'static str {
    month_index(month).map_or("", |i| MONTHS_EN[i])
}

/// Arabic month name; empty for months outside 1..=12.
pub fn month_name_ar(month: u32) -> &'static str {
    month_index(month).map_or("", |i| MONTHS_AR[i])
}

fn month_index(month: u32) -> Option<usize> {
    (1..=12).contains(&month).then(|| month as usize - 1)
}

/// Replaces ASCII digits with Arabic-Indic digits.
pub fn to_arabic_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
            None => c,
        })
        .collect()
}

/// Display helpers for [`HijriDate`].
pub trait HijriDateExt {
    /// "9 Ramadan 1445 AH"
    fn display_en(&self) -> String;
    /// "٩ رمضان ١٤٤٥ هـ"
    fn display_ar(&self) -> String;
    fn month_name_en(&self) -> &'static str;
    fn month_name_ar(&self) -> &'static str;
}

impl HijriDateExt for HijriDate {
    fn display_en(&self) -> String {
        format!("{} {} {} AH", self.day, month_name_en(self.month), self.year)
    }

    fn display_ar(&self) -> String {
        let text = format!("{} {} {} هـ", self.day, month_name_ar(self.month), self.year);
        to_arabic_digits(&text)
    }

    fn month_name_en(&self) -> &'static str {
        month_name_en(self.month)
    }

    fn month_name_ar(&self) -> &'static str {
        month_name_ar(self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_names() {
        assert_eq!(month_name_en(1), "Muharram");
        assert_eq!(month_name_en(9), "Ramadan");
        assert_eq!(month_name_en(12), "Dhul-Hijjah");
        assert_eq!(month_name_ar(9), "رمضان");
        assert_eq!(month_name_ar(12), "ذو الحجة");
    }

    #[test]
    fn test_month_names_out_of_range() {
        assert_eq!(month_name_en(0), "");
        assert_eq!(month_name_en(13), "");
        assert_eq!(month_name_ar(0), "");
    }

    #[test]
    fn test_arabic_digits() {
        assert_eq!(to_arabic_digits("1445"), "١٤٤٥");
        assert_eq!(to_arabic_digits("05:09 x"), "٠٥:٠٩ x");
    }

    #[test]
    fn test_display() {
        let date = HijriDate::new(1445, 9, 9);
        assert_eq!(date.display_en(), "9 Ramadan 1445 AH");
        assert_eq!(date.display_ar(), "٩ رمضان ١٤٤٥ هـ");
    }
}
