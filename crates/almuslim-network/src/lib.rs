//! Network module for remote data fetching.
//!
//! Provides IP-based geolocation. HTTP requests are gated behind the `async`
//! feature; response parsing is always available.

pub mod geo;

pub use geo::{LocationInfo, parse_location};
#[cfg(feature = "async")]
pub use geo::{detect_location, detect_location_from};
