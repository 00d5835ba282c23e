//! # geocaching-json
//!
//! A Rust client for the Geocaching Live JSON service (API version 6).
//!
//! The library talks to the service over plain HTTP with JSON bodies and
//! decodes the responses into typed records without ever holding a whole
//! response in memory.
//!
//! ## Overview
//!
//! - [`config`] holds the endpoint, timeouts and debug switch.
//! - [`client`] performs the HTTP exchange, handles gzip and deflate
//!   compression and sorts responses into JSON successes and
//!   [`GeocachingError::InvalidResponse`] failures.
//! - [`protocol::v6`] contains the record types, the integer-coded
//!   enumerations, the `/Date(...)/` parser and the search filters used to
//!   build request bodies.
//!
//! The decoder is forward-compatible: members it does not know are skipped
//! at any depth, unknown enumeration codes become a sentinel value and
//! unparseable dates become `None`. Only broken JSON structure fails a
//! decode.
//!
//! ## Example
//!
//! ```no_run
//! use geocaching_json::client::blocking::GeocachingClient;
//! use geocaching_json::config::GeocachingApiConfiguration;
//! use geocaching_json::protocol::Filter;
//! use geocaching_json::protocol::v6::filter::{PointRadiusFilter, QueryBuilder};
//! use geocaching_json::protocol::v6::response::SearchForGeocachesResponse;
//!
//! fn example() -> geocaching_json::Result<()> {
//!     let client = GeocachingClient::new(&GeocachingApiConfiguration::default())?;
//!
//!     let filters: Vec<Box<dyn Filter>> =
//!         vec![Box::new(PointRadiusFilter::new(50.08, 14.42, 2000))];
//!     let query = QueryBuilder::new()
//!         .field("AccessToken", "...")?
//!         .field("IsLite", true)?
//!         .field("MaxPerPage", 20)?
//!         .filters(&filters)?;
//!
//!     let result: SearchForGeocachesResponse =
//!         client.call("SearchForGeocaches", &query)?.decode()?;
//!     for cache in &result.geocaches {
//!         println!("{:?} {:?}", cache.code, cache.name);
//!     }
//!     Ok(())
//! }
//! ```

use crate::error::GeocachingError;

/// HTTP transport and response classification
pub mod client;

/// Endpoint, timeout and debug settings
pub mod config;

/// Error types used throughout the library
pub mod error;

/// Record types, decoding helpers and search filters
pub mod protocol;

/// Convenience type alias for Results with GeocachingError
pub type Result<T> = core::result::Result<T, GeocachingError>;
