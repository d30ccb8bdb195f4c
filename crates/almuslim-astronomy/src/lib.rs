//! Solar model and prayer time engine.
//!
//! All times are fractional hours of local civil time on the requested date.

pub mod clock;
pub mod prayer;
pub mod solar;

pub use clock::{clock_parts, format_clock, format_duration};
pub use prayer::{calculate_prayer_times, local_utc_offset_hours};
pub use solar::SolarParams;
