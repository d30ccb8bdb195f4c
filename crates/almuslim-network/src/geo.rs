//! IP-based Geolocation Module.
//!
//! Approximate location detection via the ipapi.co JSON endpoint.

use almuslim_types::{AlmuslimError, GeoLocation};
use serde::Deserialize;

/// Default geolocation endpoint.
pub const IPAPI_URL: &str = "https://ipapi.co/json/";

/// Location information with coordinates and place name.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationInfo {
    /// Geographic coordinates.
    pub coords: GeoLocation,
    /// City name (if available).
    pub city: Option<String>,
    /// Region/Province name (if available).
    pub region: Option<String>,
    /// Country name (if available).
    pub country: Option<String>,
    /// IANA timezone name (if available).
    pub timezone: Option<String>,
}

impl LocationInfo {
    /// Returns formatted location string (e.g., "Riyadh, Riyadh Region, Saudi Arabia").
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [
            self.city.as_deref(),
            self.region.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            format!("{:.4}°, {:.4}°", self.coords.lat, self.coords.lng)
        } else {
            parts.join(", ")
        }
    }

    /// "City, Country" query string for matching against a city database.
    pub fn city_query(&self) -> Option<String> {
        let city = self.city.as_deref()?;
        Some(match self.country.as_deref() {
            Some(country) => format!("{city}, {country}"),
            None => city.to_string(),
        })
    }

    /// The reported timezone, or a per-country default when the service omits it.
    pub fn timezone_or_fallback(&self) -> Option<String> {
        if let Some(tz) = &self.timezone {
            return Some(tz.clone());
        }
        match self.country.as_deref().map(str::to_lowercase).as_deref() {
            Some("saudi arabia") => Some("Asia/Riyadh".to_string()),
            _ => None,
        }
    }
}

/// ipapi.co response structure.
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    city: Option<String>,
    region: Option<String>,
    country_name: Option<String>,
    timezone: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

impl IpApiResponse {
    fn into_location(self) -> Result<LocationInfo, AlmuslimError> {
        if self.error {
            let reason = self.reason.unwrap_or_else(|| "unknown error".to_string());
            return Err(AlmuslimError::Network(format!("geolocation service error: {reason}")));
        }
        let (lat, lng) = self
            .latitude
            .zip(self.longitude)
            .ok_or_else(|| AlmuslimError::Network("geolocation response has no coordinates".into()))?;

        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        Ok(LocationInfo {
            coords: GeoLocation::new(lat, lng)?,
            city: non_empty(self.city),
            region: non_empty(self.region),
            country: non_empty(self.country_name),
            timezone: non_empty(self.timezone),
        })
    }
}

/// Parses an ipapi.co JSON body.
pub fn parse_location(body: &str) -> Result<LocationInfo, AlmuslimError> {
    let response: IpApiResponse = serde_json::from_str(body)
        .map_err(|e| AlmuslimError::Network(format!("failed to parse geolocation response: {e}")))?;
    response.into_location()
}

/// Detects the approximate location of this machine's public IP.
///
/// # Example
/// ```rust,no_run
/// use almuslim_network::geo::detect_location;
///
/// #[tokio::main]
/// async fn main() {
///     let info = detect_location().await.unwrap();
///     println!("Location: {}", info.display_name());
/// }
/// ```
#[cfg(feature = "async")]
pub async fn detect_location() -> Result<LocationInfo, AlmuslimError> {
    detect_location_from(IPAPI_URL).await
}

/// Same as [`detect_location`] against a custom endpoint.
#[cfg(feature = "async")]
pub async fn detect_location_from(url: &str) -> Result<LocationInfo, AlmuslimError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("almuslim/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .map_err(|e| AlmuslimError::Network(format!("failed to create HTTP client: {e}")))?;

    log::debug!("requesting geolocation from {url}");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AlmuslimError::Network(format!("geolocation request failed: {e}")))?
        .error_for_status()
        .map_err(|e| AlmuslimError::Network(format!("geolocation request failed: {e}")))?;

    let body = response
        .text()
        .await
        .map_err(|e| AlmuslimError::Network(format!("failed to read geolocation response: {e}")))?;

    let info = parse_location(&body)?;
    log::info!("detected location: {}", info.display_name());
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn riyadh() -> LocationInfo {
        LocationInfo {
            coords: GeoLocation::new_unchecked(24.7136, 46.6753),
            city: Some("Riyadh".to_string()),
            region: Some("Riyadh Region".to_string()),
            country: Some("Saudi Arabia".to_string()),
            timezone: None,
        }
    }

    #[test]
    fn test_location_info_display_name() {
        assert_eq!(riyadh().display_name(), "Riyadh, Riyadh Region, Saudi Arabia");
        assert_eq!(riyadh().city_query().as_deref(), Some("Riyadh, Saudi Arabia"));
    }

    #[test]
    fn test_location_info_display_name_coords_only() {
        let info = LocationInfo {
            coords: GeoLocation::new_unchecked(-6.2088, 106.8456),
            city: None,
            region: None,
            country: None,
            timezone: None,
        };
        assert!(info.display_name().contains("-6.2088"));
        assert_eq!(info.city_query(), None);
    }

    #[test]
    fn test_timezone_fallback() {
        assert_eq!(riyadh().timezone_or_fallback().as_deref(), Some("Asia/Riyadh"));
        let mut info = riyadh();
        info.country = Some("Egypt".to_string());
        assert_eq!(info.timezone_or_fallback(), None);
    }

    #[test]
    fn test_parse_location() {
        let body = r#"{"ip":"1.2.3.4","city":"Cairo","region":"Cairo Governorate",
            "country_name":"Egypt","latitude":30.0444,"longitude":31.2357,"timezone":"Africa/Cairo"}"#;
        let info = parse_location(body).unwrap();
        assert_eq!(info.city.as_deref(), Some("Cairo"));
        assert_eq!(info.timezone.as_deref(), Some("Africa/Cairo"));
        assert!((info.coords.lat - 30.0444).abs() < 1e-9);
    }

    #[test]
    fn test_parse_location_errors() {
        let limited = r#"{"error":true,"reason":"RateLimited"}"#;
        match parse_location(limited) {
            Err(AlmuslimError::Network(msg)) => assert!(msg.contains("RateLimited")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_location(r#"{"city":"Nowhere"}"#).is_err());
        assert!(parse_location("<html>").is_err());
    }
}
