//! Live V6 response records
//!
//! This module defines the typed records decoded from service responses.
//! Records are read straight from the response stream; members not listed
//! here are skipped, so new service fields do not break decoding.
//!
//! Absent and `null` members decode to:
//! - `None` for optional scalars, strings, users and geocache types
//! - an empty list or set for list members; `null` list elements are dropped
//! - `false` for flags
//! - [`ContainerType::NotChosen`], [`CacheLogType::Unknown`] and
//!   [`WaypointType::ReferencePoint`] for the respective enums

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{DefaultOnNull, serde_as};

use super::de::{attributes, json_date, json_utc_date, lenient_list};
use super::types::*;

/// Image attached to a geocache or a log
///
/// Every member defaults to an empty string.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageData {
    /// Caption entered by the uploader
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub description: String,
    /// URL of the image scaled for mobile devices
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub mobile_url: String,
    /// Image title
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub name: String,
    /// URL of the thumbnail
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub thumb_url: String,
    /// URL of the full-size image
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub url: String,
}

/// Geocaching member: cache owner or log author
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    /// Numeric account id
    #[serde(rename = "Id")]
    pub id: Option<i64>,
    /// Public user name
    #[serde(rename = "UserName")]
    pub user_name: Option<String>,
    /// Membership level, sent either as an object or as a scaled number
    #[serde(rename = "MemberType")]
    pub member_type: Option<MemberType>,
    /// URL of the profile picture
    #[serde(rename = "AvatarUrl")]
    pub avatar_url: Option<String>,
    /// Stable public identifier of the account
    #[serde(rename = "PublicGuid")]
    pub public_guid: Option<String>,
    /// Number of caches found
    #[serde(rename = "FindCount")]
    pub find_count: Option<i32>,
    /// Number of caches hidden
    #[serde(rename = "HideCount")]
    pub hide_count: Option<i32>,
    /// Number of images in the user's gallery
    #[serde(rename = "GalleryImageCount")]
    pub gallery_image_count: Option<i32>,
    /// Whether the account is a site administrator
    #[serde(rename = "IsAdmin", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub is_admin: bool,
}

/// Additional waypoint of a geocache
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Waypoint {
    /// Latitude in degrees (positive = North)
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    /// Longitude in degrees (positive = East)
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    /// Entered time; the service sends it as UTC with a misleading offset
    #[serde(rename = "UTCEnteredDate", default, deserialize_with = "json_utc_date")]
    pub time: Option<DateTime<Utc>>,
    /// Waypoint code, the cache code with a two-letter prefix
    #[serde(rename = "Code")]
    pub waypoint_code: Option<String>,
    /// Short title of the waypoint
    #[serde(rename = "Description")]
    pub name: Option<String>,
    /// Free-form note from the owner
    #[serde(rename = "Comment")]
    pub note: Option<String>,
    #[serde(rename = "WptTypeID", default)]
    pub waypoint_type: WaypointType,
}

impl Waypoint {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }

    pub fn icon_name(&self) -> &'static str {
        self.waypoint_type.icon_name()
    }
}

/// Log entry written on a geocache
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheLog {
    /// Numeric log id
    #[serde(rename = "ID")]
    pub id: Option<i64>,
    /// Log code (`GL...`)
    #[serde(rename = "Code")]
    pub code: Option<String>,
    /// Code of the logged geocache
    #[serde(rename = "CacheCode")]
    pub cache_code: Option<String>,
    /// Kind of log: found, not found, note, maintenance ...
    #[serde(rename = "LogType", default)]
    pub log_type: CacheLogType,
    /// Author of the log
    #[serde(rename = "Finder")]
    pub author: Option<User>,
    /// Log text, possibly ROT13 encoded (see `text_encoded`)
    #[serde(rename = "LogText")]
    pub text: Option<String>,
    /// Time the log was submitted, in UTC
    #[serde(rename = "UTCCreateDate", default, deserialize_with = "json_utc_date")]
    pub created: Option<DateTime<Utc>>,
    /// Day of the visit as entered by the author
    #[serde(rename = "VisitDate", default, deserialize_with = "json_date")]
    pub visited: Option<DateTime<Utc>>,
    /// Photos attached to the log
    #[serde(rename = "Images", default, deserialize_with = "lenient_list")]
    pub images: Vec<ImageData>,
    #[serde(rename = "IsArchived", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub archived: bool,
    /// Whether `text` is ROT13 encoded
    #[serde(rename = "LogIsEncoded", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub text_encoded: bool,
}

/// Geocache listing
///
/// Lite searches leave descriptions, logs, waypoints and images empty.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geocache {
    /// Numeric cache id
    #[serde(rename = "ID")]
    pub id: Option<i64>,
    /// Cache code (`GC...`)
    #[serde(rename = "Code")]
    pub code: Option<String>,
    /// Cache name
    #[serde(rename = "Name")]
    pub name: Option<String>,
    /// Cache type; `None` when the service sends no type at all
    #[serde(rename = "CacheType")]
    pub geocache_type: Option<GeocacheType>,
    /// Container size
    #[serde(rename = "ContainerType", default)]
    pub container_type: ContainerType,
    /// Account that owns the listing
    #[serde(rename = "Owner")]
    pub owner: Option<User>,
    /// Name shown as the hider, may differ from the owner's user name
    #[serde(rename = "PlacedBy")]
    pub placed_by: Option<String>,
    /// Difficulty rating, 1.0 to 5.0 in half steps
    #[serde(rename = "Difficulty")]
    pub difficulty: Option<f32>,
    /// Terrain rating, 1.0 to 5.0 in half steps
    #[serde(rename = "Terrain")]
    pub terrain: Option<f32>,
    /// Latitude in degrees (positive = North)
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    /// Longitude in degrees (positive = East)
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Archived", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub archived: bool,
    /// `false` while the listing is temporarily disabled
    #[serde(rename = "Available", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub available: bool,
    /// Premium-member-only cache
    #[serde(rename = "IsPremium", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub premium: bool,
    /// Whether the calling user has logged a find
    #[serde(rename = "HasbeenFoundbyUser", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub found_by_user: bool,
    #[serde(rename = "Country")]
    pub country_name: Option<String>,
    #[serde(rename = "State")]
    pub state_name: Option<String>,
    /// Time the listing was created
    #[serde(rename = "DateCreated", default, deserialize_with = "json_date")]
    pub created: Option<DateTime<Utc>>,
    /// Hidden date, in UTC
    #[serde(rename = "UTCPlaceDate", default, deserialize_with = "json_utc_date")]
    pub placed: Option<DateTime<Utc>>,
    /// Time of the last listing change
    #[serde(rename = "DateLastUpdate", default, deserialize_with = "json_date")]
    pub last_updated: Option<DateTime<Utc>>,
    /// Time of the most recent visit log
    #[serde(rename = "DateLastVisited", default, deserialize_with = "json_date")]
    pub last_visited: Option<DateTime<Utc>>,
    #[serde(rename = "ShortDescription")]
    pub short_description: Option<String>,
    /// Whether `short_description` is HTML
    #[serde(rename = "ShortDescriptionIsHtml", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub short_description_html: bool,
    #[serde(rename = "LongDescription")]
    pub long_description: Option<String>,
    /// Whether `long_description` is HTML
    #[serde(rename = "LongDescriptionIsHtml", default)]
    #[serde_as(as = "DefaultOnNull")]
    pub long_description_html: bool,
    /// Hint, ROT13 encoded as on the website
    #[serde(rename = "EncodedHints")]
    pub hint: Option<String>,
    /// Favorite points awarded by finders
    #[serde(rename = "FavoritePoints")]
    pub favorite_points: Option<i32>,
    /// Number of trackables currently in the cache
    #[serde(rename = "TrackableCount")]
    pub trackable_count: Option<i32>,
    /// Listing page on geocaching.com
    #[serde(rename = "Url")]
    pub url: Option<String>,
    /// Attributes switched on for the cache
    #[serde(rename = "Attributes", default, deserialize_with = "attributes")]
    pub attributes: Attributes,
    /// Parking, stages, final location and other points
    #[serde(rename = "AdditionalWaypoints", default, deserialize_with = "lenient_list")]
    pub waypoints: Vec<Waypoint>,
    /// Most recent logs, newest first
    #[serde(rename = "GeocacheLogs", default, deserialize_with = "lenient_list")]
    pub cache_logs: Vec<CacheLog>,
    /// Listing images
    #[serde(rename = "Images", default, deserialize_with = "lenient_list")]
    pub images: Vec<ImageData>,
}

impl Geocache {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates::new(self.latitude?, self.longitude?))
    }
}

/// Download quota of the calling account
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheLimits {
    /// Full caches downloaded in the current period
    #[serde(rename = "CurrentCacheCount")]
    pub current: Option<i32>,
    /// Full caches allowed per period
    #[serde(rename = "MaxCacheCount")]
    pub max: Option<i32>,
    /// Quota period in minutes
    #[serde(rename = "CacheLimitsPeriod")]
    pub period: Option<i32>,
}

/// Service-level status carried by every response envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Status {
    /// Service status code, `0` on success
    #[serde(rename = "StatusCode")]
    pub code: Option<i32>,
    /// Human-readable status text
    #[serde(rename = "StatusMessage")]
    pub message: Option<String>,
    /// Server-side exception text, usually empty
    #[serde(rename = "ExceptionDetails")]
    pub exception_details: Option<String>,
}

impl Status {
    /// `true` only for an explicit status code `0`
    pub fn is_ok(&self) -> bool {
        self.code == Some(0)
    }
}

/// Envelope of `SearchForGeocaches` and `GetMoreGeocaches`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchForGeocachesResponse {
    #[serde(rename = "Status")]
    pub status: Option<Status>,
    /// Caches of this page, in service order
    #[serde(rename = "Geocaches", default, deserialize_with = "lenient_list")]
    pub geocaches: Vec<Geocache>,
    /// Matches over all pages
    #[serde(rename = "TotalMatchingCaches")]
    pub total_matching_caches: Option<i32>,
    #[serde(rename = "CacheLimits")]
    pub cache_limits: Option<CacheLimits>,
}

/// Envelope of `GetGeocacheLogsByCacheCode`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocacheLogsResponse {
    #[serde(rename = "Status")]
    pub status: Option<Status>,
    #[serde(rename = "Logs", default, deserialize_with = "lenient_list")]
    pub logs: Vec<CacheLog>,
}
