//! Clock-face formatting of fractional hours.

/// Formats fractional hours as a wall-clock string.
///
/// Values outside [0, 24) wrap onto the clock. Minutes round half-up, and
/// a carry to 60 rolls into the next hour (23:59:40 shows as "00:00").
///
/// ```rust
/// use almuslim_astronomy::format_clock;
/// assert_eq!(format_clock(13.5, true), "13:30");
/// assert_eq!(format_clock(13.5, false), "1:30 PM");
/// assert_eq!(format_clock(-0.25, true), "23:45");
/// ```
pub fn format_clock(hours: f64, use_24h: bool) -> String {
    let (hour, minute) = clock_parts(hours);
    if use_24h {
        format!("{hour:02}:{minute:02}")
    } else {
        let suffix = if hour < 12 { "AM" } else { "PM" };
        let display = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{display}:{minute:02} {suffix}")
    }
}

/// Hour and minute on a 24-hour clock.
pub fn clock_parts(hours: f64) -> (u32, u32) {
    let h = hours.rem_euclid(24.0);
    let mut hour = (h + 1e-9).floor();
    let mut minute = ((h - hour) * 60.0 + 0.5).floor();
    if minute >= 60.0 {
        hour = (hour + 1.0) % 24.0;
        minute = 0.0;
    }
    (hour as u32 % 24, minute as u32)
}

/// Formats a span of hours as "HH:MM", e.g. a countdown to the next prayer.
///
/// Same rounding as [`format_clock`] but spans of a day or more are not wrapped.
pub fn format_duration(hours: f64) -> String {
    let h = hours.max(0.0);
    let mut whole = (h + 1e-9).floor();
    let mut minute = ((h - whole) * 60.0 + 0.5).floor();
    if minute >= 60.0 {
        whole += 1.0;
        minute = 0.0;
    }
    format!("{:02}:{:02}", whole as u64, minute.max(0.0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_24h() {
        assert_eq!(format_clock(13.5, true), "13:30");
        assert_eq!(format_clock(5.149, true), "05:09");
        assert_eq!(format_clock(0.0, true), "00:00");
    }

    #[test]
    fn test_format_12h() {
        assert_eq!(format_clock(13.5, false), "1:30 PM");
        assert_eq!(format_clock(0.25, false), "12:15 AM");
        assert_eq!(format_clock(12.0, false), "12:00 PM");
        assert_eq!(format_clock(9.75, false), "9:45 AM");
    }

    #[test]
    fn test_format_wraps() {
        assert_eq!(format_clock(-0.25, true), "23:45");
        assert_eq!(format_clock(25.5, true), "01:30");
        assert_eq!(format_clock(24.359, true), "00:22");
        assert_eq!(format_clock(-24.5, true), "23:30");
        assert_eq!(format_clock(-48.25, true), "23:45");
        assert_eq!(format_clock(49.0, false), "1:00 AM");
    }

    #[test]
    fn test_minute_carry() {
        assert_eq!(format_clock(23.999, true), "00:00");
        assert_eq!(format_clock(11.9999, false), "12:00 PM");
        assert_eq!(clock_parts(6.9979), (7, 0));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(2.5), "02:30");
        assert_eq!(format_duration(0.01), "00:01");
        assert_eq!(format_duration(1.9999), "02:00");
        assert_eq!(format_duration(25.25), "25:15");
        assert_eq!(format_duration(-1.0), "00:00");
    }
}
