//! Blocking (synchronous) HTTP transport
//!
//! [`GeocachingClient`] performs one HTTP/1.1 exchange per call on a
//! `reqwest` blocking client. The response body is not buffered: it is
//! decompressed and handed to the decoder as the connection delivers it.

use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE,
    HeaderMap,
};

use crate::client::{JsonDownloader, JsonResponse, ResponseHead, classify};
use crate::config::GeocachingApiConfiguration;
use crate::error::GeocachingError;
use crate::Result;
use crate::protocol::v6::filter::QueryBuilder;

/// HTTP client for the Geocaching JSON service
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GeocachingClient {
    http: reqwest::blocking::Client,
    config: GeocachingApiConfiguration,
}

impl GeocachingClient {
    /// Creates a client with the timeouts and user agent of `config`
    pub fn new(config: &GeocachingApiConfiguration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(GeocachingError::network)?;

        Ok(GeocachingClient {
            http,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &GeocachingApiConfiguration {
        &self.config
    }

    /// POSTs a built query to a service method
    ///
    /// ```no_run
    /// # use geocaching_json::client::blocking::GeocachingClient;
    /// # use geocaching_json::config::GeocachingApiConfiguration;
    /// # use geocaching_json::protocol::Filter;
    /// # use geocaching_json::protocol::v6::filter::{PointRadiusFilter, QueryBuilder};
    /// # use geocaching_json::protocol::v6::response::SearchForGeocachesResponse;
    /// # fn example() -> geocaching_json::Result<()> {
    /// let client = GeocachingClient::new(&GeocachingApiConfiguration::default())?;
    /// let filters: Vec<Box<dyn Filter>> = vec![Box::new(PointRadiusFilter::new(50.0, 14.4, 1000))];
    /// let query = QueryBuilder::new()
    ///     .field("AccessToken", "token")?
    ///     .field("MaxPerPage", 20)?
    ///     .filters(&filters)?;
    /// let result: SearchForGeocachesResponse =
    ///     client.call("SearchForGeocaches", &query)?.decode()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn call(&self, method: &str, query: &QueryBuilder) -> Result<JsonResponse> {
        let body = query.to_vec()?;
        self.post(&self.config.endpoint(method), &body)
    }

    fn execute(&self, request: reqwest::blocking::RequestBuilder) -> Result<JsonResponse> {
        let response = request
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "en-US")
            .header(ACCEPT_ENCODING, "gzip, deflate")
            .send()
            .map_err(|err| {
                tracing::error!(error = %err, "request failed");
                GeocachingError::network(err)
            })?;

        let status = response.status();
        let head = ResponseHead {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_owned(),
            content_encoding: header_value(response.headers(), CONTENT_ENCODING),
            content_type: header_value(response.headers(), CONTENT_TYPE),
        };
        tracing::debug!(
            status = head.status,
            content_type = head.content_type.as_deref().unwrap_or(""),
            "response received"
        );

        classify(&head, response, self.config.debug)
    }
}

fn header_value(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

impl JsonDownloader for GeocachingClient {
    fn get(&self, url: &str) -> Result<JsonResponse> {
        tracing::debug!(url, "GET");
        self.execute(self.http.get(url))
    }

    fn post(&self, url: &str, body: &[u8]) -> Result<JsonResponse> {
        tracing::debug!(url, len = body.len(), "POST");
        if self.config.debug {
            tracing::debug!(body = %String::from_utf8_lossy(body), "request");
        }

        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, body.len())
            .body(body.to_vec());
        self.execute(request)
    }
}
