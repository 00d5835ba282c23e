//! Geocaching Live API version 6 JSON protocol
//!
//! This module implements the JSON schema family spoken by the Live V6
//! service: search filters on the request side and geocache, waypoint,
//! log and user records on the response side.
//!
//! # Protocol Overview
//!
//! - Requests are single JSON objects, POSTed to `<entry point>/<Method>?format=json`
//! - Search criteria are keyed by filter name inside the request object
//! - Dates are sent as `/Date(<epoch ms>[+-]HHMM)/` strings
//! - Enumerations are sent either as `{"<Field>TypeId": n}` objects or,
//!   for member types, as a bare number scaled by ten
//!
//! The decoder is lenient on purpose: unknown fields are skipped, unknown
//! enum codes fall back to a sentinel and bad dates decode to `None`.

use crate::protocol::GeocachingJsonResponse;

/// Date string decoding
pub mod date;
/// Field-level deserializers shared by the response records
pub mod de;
/// Search filters and the query builder
pub mod filter;
/// Response records
pub mod response;
/// Enumerations and small value types used in records
pub mod types;

/// Production service entry point
pub const PRODUCTION_ENTRY_POINT_URL: &str = "https://api.groundspeak.com/LiveV6/geocaching.svc";

impl GeocachingJsonResponse for response::ImageData {}
impl GeocachingJsonResponse for response::User {}
impl GeocachingJsonResponse for response::Waypoint {}
impl GeocachingJsonResponse for response::CacheLog {}
impl GeocachingJsonResponse for response::Geocache {}
impl GeocachingJsonResponse for response::CacheLimits {}
impl GeocachingJsonResponse for response::Status {}
impl GeocachingJsonResponse for response::SearchForGeocachesResponse {}
impl GeocachingJsonResponse for response::GeocacheLogsResponse {}
