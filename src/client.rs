//! Transport for the Geocaching JSON service
//!
//! This module holds the transport-independent half of the client: the
//! [`JsonDownloader`] seam, the decompression step and the classification
//! of a completed HTTP exchange into a decodable [`JsonResponse`] or an
//! [`GeocachingError::InvalidResponse`].
//!
//! The HTTP implementation itself lives in the `blocking` submodule.
//!
//! # Example
//!
//! ```no_run
//! use geocaching_json::client::{JsonDownloader, blocking::GeocachingClient};
//! use geocaching_json::config::GeocachingApiConfiguration;
//! use geocaching_json::protocol::v6::response::SearchForGeocachesResponse;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeocachingApiConfiguration::default();
//! let client = GeocachingClient::new(&config)?;
//!
//! let body = br#"{"AccessToken":"...","IsLite":true,"MaxPerPage":10}"#;
//! let response = client.post(&config.endpoint("SearchForGeocaches"), body)?;
//! let result: SearchForGeocachesResponse = response.decode()?;
//! println!("{} caches", result.geocaches.len());
//! # Ok(())
//! # }
//! ```

use std::io::Read;

use crate::{
    Result,
    error::GeocachingError,
    protocol::{GeocachingJsonDecode, GeocachingJsonResponse},
};

/// Blocking (synchronous) HTTP transport
pub mod blocking;

/// Status codes from this value up select the error body
const HTTP_ERROR_400: u16 = 400;

/// Performs one HTTP exchange per call and hands back a live JSON stream
pub trait JsonDownloader {
    /// Sends a GET request
    fn get(&self, url: &str) -> Result<JsonResponse>;

    /// Sends a POST request with a JSON body
    fn post(&self, url: &str, body: &[u8]) -> Result<JsonResponse>;
}

/// Successful JSON response, not yet read
///
/// Wraps the decompressed body stream of the connection. Decoding reads it
/// token by token; dropping the response closes the connection.
pub struct JsonResponse {
    reader: Box<dyn Read + Send>,
}

impl JsonResponse {
    pub fn new<R: Read + Send + 'static>(reader: R) -> Self {
        JsonResponse {
            reader: Box::new(reader),
        }
    }

    /// Decodes the body into one record
    pub fn decode<Res: GeocachingJsonResponse>(self) -> Result<Res> {
        self.reader.read_response()
    }

    /// Gives up typed decoding and returns the raw body stream
    pub fn into_reader(self) -> Box<dyn Read + Send> {
        self.reader
    }
}

impl Read for JsonResponse {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl std::fmt::Debug for JsonResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonResponse").finish_non_exhaustive()
    }
}

/// `Content-Encoding` of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
    /// Raw deflate stream, without zlib header
    Deflate,
    Identity,
}

impl ContentEncoding {
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("gzip") => ContentEncoding::Gzip,
            Some(v) if v.eq_ignore_ascii_case("deflate") => ContentEncoding::Deflate,
            _ => ContentEncoding::Identity,
        }
    }

    /// Wraps the body in the matching decompressor
    pub fn decode<R: Read + Send + 'static>(self, body: R) -> Box<dyn Read + Send> {
        match self {
            ContentEncoding::Gzip => {
                tracing::debug!("GZIP OK");
                Box::new(flate2::read::GzDecoder::new(body))
            }
            ContentEncoding::Deflate => {
                tracing::debug!("DEFLATE OK");
                Box::new(flate2::read::DeflateDecoder::new(body))
            }
            ContentEncoding::Identity => {
                tracing::debug!("WITHOUT COMPRESSION");
                Box::new(body)
            }
        }
    }
}

/// Status line and headers of a completed exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    pub message: String,
    pub content_encoding: Option<String>,
    pub content_type: Option<String>,
}

impl ResponseHead {
    fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("/json"))
    }
}

fn read_body(mut body: impl Read) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    body.read_to_end(&mut buf).map_err(GeocachingError::network)?;
    Ok(buf)
}

/// Classifies a completed exchange
///
/// The body is decompressed first, whatever the status. Error statuses and
/// non-JSON content types are read to the end and returned as
/// [`GeocachingError::InvalidResponse`]. A JSON success body is returned
/// as a live stream, or, in `debug` mode, logged whole and replayed from
/// memory.
pub fn classify<R>(head: &ResponseHead, body: R, debug: bool) -> Result<JsonResponse>
where
    R: Read + Send + 'static,
{
    let body = ContentEncoding::from_header(head.content_encoding.as_deref()).decode(body);

    if head.status >= HTTP_ERROR_400 || !head.is_json() {
        let text = String::from_utf8_lossy(&read_body(body)?).into_owned();
        return Err(GeocachingError::InvalidResponse {
            status: head.status,
            message: head.message.clone(),
            body: text,
        });
    }

    if debug {
        let buf = read_body(body)?;
        tracing::debug!(body = %String::from_utf8_lossy(&buf), "response");
        return Ok(JsonResponse::new(std::io::Cursor::new(buf)));
    }

    Ok(JsonResponse::new(body))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::protocol::v6::response::{ImageData, Status};

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = flate2::write::DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn head(status: u16, encoding: Option<&str>, content_type: Option<&str>) -> ResponseHead {
        ResponseHead {
            status,
            message: "Message".into(),
            content_encoding: encoding.map(Into::into),
            content_type: content_type.map(Into::into),
        }
    }

    #[test]
    fn test_gzip_html_error_is_invalid_response() {
        let html = "<html><body>Service Unavailable</body></html>";
        let head = ResponseHead {
            message: "Service Unavailable".into(),
            ..head(503, Some("gzip"), Some("text/html; charset=utf-8"))
        };

        match classify(&head, std::io::Cursor::new(gzip(html.as_bytes())), false) {
            Err(GeocachingError::InvalidResponse {
                status,
                message,
                body,
            }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
                assert_eq!(body, html);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_json_error_status_is_not_decoded() {
        let body = r#"{"Status":{"StatusCode":3,"StatusMessage":"Not authorized"}}"#;
        let result = classify(
            &head(401, None, Some("application/json")),
            std::io::Cursor::new(body.as_bytes().to_vec()),
            false,
        );
        match result {
            Err(err @ GeocachingError::InvalidResponse { .. }) => assert_eq!(err.status(), Some(401)),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_success_without_json_content_type() {
        for content_type in [None, Some("text/plain"), Some("application/xml")] {
            let result = classify(
                &head(200, None, content_type),
                std::io::Cursor::new(b"{}".to_vec()),
                false,
            );
            assert!(matches!(result, Err(GeocachingError::InvalidResponse { status: 200, .. })));
        }
    }

    #[test]
    fn test_success_is_decoded_through_compression() {
        let body = br#"{"StatusCode":0,"StatusMessage":"OK"}"#;
        let cases = [
            (Some("gzip"), gzip(body)),
            (Some("GZIP"), gzip(body)),
            (Some("deflate"), deflate(body)),
            (None, body.to_vec()),
            (Some("br"), body.to_vec()),
        ];

        for (encoding, data) in cases {
            for debug in [false, true] {
                let response = classify(
                    &head(200, encoding, Some("application/json; charset=utf-8")),
                    std::io::Cursor::new(data.clone()),
                    debug,
                )
                .unwrap();
                let status: Status = response.decode().unwrap();
                assert!(status.is_ok(), "{encoding:?} debug={debug}");
            }
        }
    }

    #[test]
    fn test_content_encoding_from_header() {
        assert_eq!(ContentEncoding::from_header(Some(" Deflate ")), ContentEncoding::Deflate);
        assert_eq!(ContentEncoding::from_header(Some("gzip")), ContentEncoding::Gzip);
        assert_eq!(ContentEncoding::from_header(Some("identity")), ContentEncoding::Identity);
        assert_eq!(ContentEncoding::from_header(None), ContentEncoding::Identity);
    }

    #[test]
    fn test_truncated_gzip_is_network_error() {
        let mut data = gzip(br#"{"StatusCode":0}"#);
        data.truncate(data.len() / 2);
        let result = classify(&head(500, Some("gzip"), None), std::io::Cursor::new(data), false);
        assert!(matches!(result, Err(ref err) if err.is_network()));
    }

    #[test]
    fn test_into_reader_returns_raw_body() {
        let response = JsonResponse::new(std::io::Cursor::new(br#"[{"Name":"a"}]"#.to_vec()));
        let mut raw = String::new();
        response.into_reader().read_to_string(&mut raw).unwrap();
        assert_eq!(raw, r#"[{"Name":"a"}]"#);

        let response = JsonResponse::new(std::io::Cursor::new(br#"[{"Name":"a"}]"#.to_vec()));
        let images: Vec<ImageData> = response.decode().unwrap();
        assert_eq!(images[0].name, "a");
    }
}
