#![cfg(feature = "async")]

use almuslim_network::detect_location_from;
use almuslim_types::AlmuslimError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_detect_location_from_mock() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"city":"Buraydah","region":"Al-Qassim","country_name":"Saudi Arabia",
                "latitude":26.3260,"longitude":43.9750}"#,
        ))
        .mount(&mock_server)
        .await;

    let info = detect_location_from(&format!("{}/json/", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(info.city.as_deref(), Some("Buraydah"));
    assert_eq!(info.timezone, None);
    assert_eq!(info.timezone_or_fallback().as_deref(), Some("Asia/Riyadh"));
    assert!((info.coords.lng - 43.975).abs() < 1e-9);
}

#[tokio::test]
async fn test_detect_location_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let result = detect_location_from(&format!("{}/json/", mock_server.uri())).await;
    assert!(matches!(result, Err(AlmuslimError::Network(_))));
}
