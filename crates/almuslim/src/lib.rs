//! # Almuslim
//!
//! Islamic prayer times and Hijri dates from a closed-form solar model.
//!
//! This crate is a facade that re-exports functionality from the `almuslim` ecosystem.
//!
//! ## Modules
//!
//! - `types`: Core types (GeoLocation, CalculationConfig, PrayerTimes, etc.)
//! - `solar`: Solar declination, equation of time and hour angles
//! - Hijri conversion: `HijriCalendar` (Umm al-Qura table with arithmetic fallback)
//! - `network`: IP geolocation (optional, `async` feature)
//!
//! ## Usage
//!
//! ```rust
//! use almuslim::prelude::*;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
//! let makkah = GeoLocation::new(21.4225, 39.8262).unwrap();
//! let config = CalculationConfig::new()
//!     .method(CalculationMethod::UmmAlQura)
//!     .utc_offset(3.0);
//!
//! let times = date.prayer_times(makkah, &config).unwrap();
//! println!("Fajr {}", format_clock(times.fajr, true));
//!
//! let hijri = date.hijri(&HijriCalendar::tabular());
//! println!("{}", hijri.display_en());
//! ```

pub use almuslim_core::*;
