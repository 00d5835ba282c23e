//! Service configuration
//!
//! Endpoint and timeouts used by the transport. The service is known to
//! stall on large searches, so both timeouts are always set explicitly.

use std::time::Duration;

use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};

use crate::protocol::v6::PRODUCTION_ENTRY_POINT_URL;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_USER_AGENT: &str = concat!("geocaching-json/", env!("CARGO_PKG_VERSION"));

/// Configuration of the Geocaching service client
///
/// Can be embedded in a serde-driven config file; timeouts are given in
/// milliseconds there:
///
/// ```
/// # use geocaching_json::config::GeocachingApiConfiguration;
/// let config: GeocachingApiConfiguration = serde_json::from_str(
///     r#"{"entry_point_url": "http://localhost:8080/svc", "read_timeout_ms": 5000}"#,
/// )?;
/// assert_eq!(config.read_timeout.as_secs(), 5);
/// assert_eq!(config.endpoint("SearchForGeocaches"), "http://localhost:8080/svc/SearchForGeocaches?format=json");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeocachingApiConfiguration {
    /// Service entry point, without a trailing method name
    pub entry_point_url: String,
    #[serde(rename = "connect_timeout_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub connect_timeout: Duration,
    #[serde(rename = "read_timeout_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub read_timeout: Duration,
    pub user_agent: String,
    /// Log every response body before decoding it
    ///
    /// Forces the whole body into memory.
    pub debug: bool,
}

impl Default for GeocachingApiConfiguration {
    fn default() -> Self {
        GeocachingApiConfiguration {
            entry_point_url: PRODUCTION_ENTRY_POINT_URL.into(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.into(),
            debug: false,
        }
    }
}

impl GeocachingApiConfiguration {
    pub fn new(entry_point_url: impl Into<String>) -> Self {
        GeocachingApiConfiguration {
            entry_point_url: entry_point_url.into(),
            ..Default::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// URL of a service method, asking for a JSON response
    pub fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/{}?format=json",
            self.entry_point_url.trim_end_matches('/'),
            method
        )
    }
}
