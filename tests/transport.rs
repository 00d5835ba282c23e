//! Integration tests for the blocking transport using wiremock.

use std::io::Write;
use std::time::Duration;

use geocaching_json::client::JsonDownloader;
use geocaching_json::client::blocking::GeocachingClient;
use geocaching_json::config::GeocachingApiConfiguration;
use geocaching_json::error::GeocachingError;
use geocaching_json::protocol::Filter;
use geocaching_json::protocol::v6::filter::{CacheCodeFilter, QueryBuilder, StatesFilter};
use geocaching_json::protocol::v6::response::{SearchForGeocachesResponse, User};
use geocaching_json::protocol::v6::types::{GeocacheType, MemberType};
use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_RESPONSE: &str = r#"{
    "Status": {"StatusCode": 0, "StatusMessage": "OK", "ExceptionDetails": ""},
    "Geocaches": [{
        "Code": "GC1234",
        "Name": "Under the bridge",
        "CacheType": {"GeocacheTypeId": 2, "GeocacheTypeName": "Traditional Cache"},
        "Owner": {"UserName": "owner", "MemberType": {"MemberTypeId": 3}},
        "UTCPlaceDate": "/Date(1318763400000-0700)/",
        "SomethingNew": {"Nested": [1, 2, {"Deep": null}]}
    }],
    "TotalMatchingCaches": 1
}"#;

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn config(server: &MockServer) -> GeocachingApiConfiguration {
    GeocachingApiConfiguration::new(format!("{}/svc", server.uri()))
        .with_connect_timeout(Duration::from_secs(2))
        .with_read_timeout(Duration::from_secs(5))
}

/// Runs a blocking client call off the async test runtime
async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gzip_search_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/svc/SearchForGeocaches"))
        .and(query_param("format", "json"))
        .and(header("Content-Type", "application/json"))
        .and(header("Accept-Language", "en-US"))
        .and(header_exists("Accept-Encoding"))
        .and(body_json(serde_json::json!({
            "AccessToken": "token",
            "MaxPerPage": 10,
            "CacheCode": {"CacheCodes": ["GC1234"]}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(gzip(SEARCH_RESPONSE.as_bytes()), "application/json; charset=utf-8")
                .insert_header("Content-Encoding", "gzip"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = config(&server);
    let result = blocking(move || {
        let client = GeocachingClient::new(&config)?;
        let filters: Vec<Box<dyn Filter>> = vec![
            Box::new(CacheCodeFilter::new(["GC1234"])),
            Box::new(StatesFilter::new(vec![])),
        ];
        let query = QueryBuilder::new()
            .field("AccessToken", "token")?
            .field("MaxPerPage", 10)?
            .filters(&filters)?;
        client
            .call("SearchForGeocaches", &query)?
            .decode::<SearchForGeocachesResponse>()
    })
    .await
    .unwrap();

    assert!(result.status.unwrap().is_ok());
    assert_eq!(result.total_matching_caches, Some(1));
    let cache = &result.geocaches[0];
    assert_eq!(cache.code.as_deref(), Some("GC1234"));
    assert_eq!(cache.geocache_type, Some(GeocacheType::Traditional));
    assert_eq!(
        cache.owner.as_ref().and_then(|o| o.member_type),
        Some(MemberType::Premium)
    );
    assert_eq!(cache.placed.unwrap().timestamp_millis(), 1318763400000);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_deflate_get_is_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/svc/GetYourUserProfile"))
        .and(header("Accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    deflate(br#"{"UserName":"cacher","MemberType":20,"FindCount":42}"#),
                    "application/json",
                )
                .insert_header("Content-Encoding", "deflate"),
        )
        .mount(&server)
        .await;

    let config = config(&server);
    let user = blocking(move || {
        let client = GeocachingClient::new(&config)?;
        client
            .get(&config.endpoint("GetYourUserProfile"))?
            .decode::<User>()
    })
    .await
    .unwrap();

    assert_eq!(user.user_name.as_deref(), Some("cacher"));
    assert_eq!(user.member_type, Some(MemberType::Charter));
    assert_eq!(user.find_count, Some(42));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gzip_html_error_page() {
    let server = MockServer::start().await;
    let html = "<html><body><h1>Service Unavailable</h1></body></html>";

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_raw(gzip(html.as_bytes()), "text/html")
                .insert_header("Content-Encoding", "gzip"),
        )
        .mount(&server)
        .await;

    let config = config(&server);
    let err = blocking(move || {
        let client = GeocachingClient::new(&config)?;
        client.post(&config.endpoint("SearchForGeocaches"), b"{}")
    })
    .await
    .unwrap_err();

    match err {
        GeocachingError::InvalidResponse {
            status,
            message,
            body,
        } => {
            assert_eq!(status, 503);
            assert_eq!(message, "Service Unavailable");
            assert_eq!(body, html);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_success_with_html_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>maintenance</p>", "text/html"))
        .mount(&server)
        .await;

    let config = config(&server);
    let err = blocking(move || {
        let client = GeocachingClient::new(&config)?;
        client.get(&config.endpoint("GetYourUserProfile"))
    })
    .await
    .unwrap_err();

    assert_eq!(err.status(), Some(200));
    assert!(matches!(err, GeocachingError::InvalidResponse { ref body, .. } if body == "<p>maintenance</p>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_truncated_json_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"UserName":"cacher","#, "application/json"),
        )
        .mount(&server)
        .await;

    let config = config(&server).with_debug(true);
    let err = blocking(move || {
        let client = GeocachingClient::new(&config)?;
        client
            .get(&config.endpoint("GetYourUserProfile"))?
            .decode::<User>()
    })
    .await
    .unwrap_err();

    assert!(matches!(err, GeocachingError::Decode(_)), "{err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_read_timeout_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{}", "application/json")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = config(&server).with_read_timeout(Duration::from_millis(200));
    let err = blocking(move || {
        let client = GeocachingClient::new(&config)?;
        client.get(&config.endpoint("GetYourUserProfile"))
    })
    .await
    .unwrap_err();

    assert!(err.is_network(), "{err:?}");
}
