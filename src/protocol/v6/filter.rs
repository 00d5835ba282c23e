//! Search filters and query assembly
//!
//! Every filter serializes to one `"Name": {...}` member of the search
//! request object. Filters are independent: a request may carry any subset
//! of them, and only those whose fields form a usable criterion are
//! written.
//!
//! # Example
//!
//! ```
//! use geocaching_json::protocol::Filter;
//! use geocaching_json::protocol::v6::filter::*;
//!
//! let filters: Vec<Box<dyn Filter>> = vec![
//!     Box::new(PointRadiusFilter::new(50.0, 14.0, 60000)),
//!     Box::new(BookmarksExcludeFilter::new(Some(true), vec![])),
//!     Box::new(StatesFilter::new(vec![])), // not valid, left out
//! ];
//!
//! let query = QueryBuilder::new()
//!     .field("IsLite", true)?
//!     .filters(&filters)?
//!     .build();
//!
//! assert!(query.get("PointRadius").is_some());
//! assert!(query.get("States").is_none());
//! # Ok::<(), geocaching_json::error::GeocachingError>(())
//! ```

use serde::Serialize;
use serde_with::skip_serializing_none;

use super::types::{ContainerType, Coordinates, GeocacheType};
use crate::{Result, error::GeocachingError, protocol::Filter};

/// Assembles the JSON request object
///
/// Filters are keyed by name; the service treats the object as an
/// unordered mapping.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    inner: serde_json::Map<String, serde_json::Value>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: &str, body: serde_json::Value) {
        self.inner.insert(name.into(), body);
    }

    /// Adds a plain top-level member, such as a page size or an access token
    pub fn field<V: Serialize>(mut self, name: &str, value: V) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(GeocachingError::Serialize)?;
        self.insert(name, value);
        Ok(self)
    }

    /// Writes every valid filter, in the order given
    ///
    /// Filters that are not valid are skipped.
    pub fn filters<F>(mut self, filters: &[F]) -> Result<Self>
    where
        F: AsRef<dyn Filter>,
    {
        for filter in filters {
            let filter = filter.as_ref();
            if filter.is_valid() {
                filter.write_to(&mut self)?;
            } else {
                tracing::debug!(filter = filter.name(), "skipping invalid filter");
            }
        }
        Ok(self)
    }

    /// Finishes the request object
    pub fn build(self) -> serde_json::Value {
        serde_json::Value::Object(self.inner)
    }

    /// Finishes the request object as UTF-8 JSON bytes for a POST body
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(&self.inner).map_err(GeocachingError::Serialize)
    }
}

macro_rules! filter_body {
    () => {
        fn body(&self) -> serde_json::Result<serde_json::Value> {
            serde_json::to_value(self)
        }
    };
}

/// Caches within a distance of a point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PointRadiusFilter {
    #[serde(rename = "DistanceInMeters")]
    pub radius: Option<i64>,
    pub point: Option<Coordinates>,
}

impl PointRadiusFilter {
    pub fn new(latitude: f64, longitude: f64, radius_in_meters: i64) -> Self {
        PointRadiusFilter {
            radius: Some(radius_in_meters),
            point: Some(Coordinates::new(latitude, longitude)),
        }
    }
}

impl Filter for PointRadiusFilter {
    fn name(&self) -> &'static str {
        "PointRadius"
    }

    fn is_valid(&self) -> bool {
        self.radius.is_some()
            && self
                .point
                .is_some_and(|p| p.latitude.is_finite() && p.longitude.is_finite())
    }

    filter_body!();
}

/// Caches inside a rectangle
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ViewportFilter {
    pub top_left: Coordinates,
    pub bottom_right: Coordinates,
}

impl ViewportFilter {
    pub fn new(top_left: Coordinates, bottom_right: Coordinates) -> Self {
        ViewportFilter {
            top_left,
            bottom_right,
        }
    }
}

impl Filter for ViewportFilter {
    fn name(&self) -> &'static str {
        "Viewport"
    }

    fn is_valid(&self) -> bool {
        [self.top_left, self.bottom_right]
            .iter()
            .all(|p| p.latitude.is_finite() && p.longitude.is_finite())
    }

    filter_body!();
}

/// Leaves out caches on bookmark lists, or on the ignore list
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookmarksExcludeFilter {
    #[serde(rename = "BookmarkListIDs", skip_serializing_if = "Vec::is_empty")]
    pub bookmark_list_ids: Vec<u32>,
    #[serde(rename = "ExcludeIgnoreList")]
    pub exclude_ignore_list: Option<bool>,
}

impl BookmarksExcludeFilter {
    pub fn new(exclude_ignore_list: Option<bool>, bookmark_list_ids: Vec<u32>) -> Self {
        BookmarksExcludeFilter {
            bookmark_list_ids,
            exclude_ignore_list,
        }
    }
}

impl Filter for BookmarksExcludeFilter {
    fn name(&self) -> &'static str {
        "BookmarksExclude"
    }

    fn is_valid(&self) -> bool {
        !self.bookmark_list_ids.is_empty() || self.exclude_ignore_list.is_some()
    }

    filter_body!();
}

/// Caches in the given states or provinces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatesFilter {
    #[serde(rename = "StateIds")]
    pub state_ids: Vec<u32>,
}

impl StatesFilter {
    pub fn new(state_ids: Vec<u32>) -> Self {
        StatesFilter { state_ids }
    }
}

impl Filter for StatesFilter {
    fn name(&self) -> &'static str {
        "States"
    }

    fn is_valid(&self) -> bool {
        !self.state_ids.is_empty()
    }

    filter_body!();
}

/// Caches in the given countries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountriesFilter {
    #[serde(rename = "CountryIds")]
    pub country_ids: Vec<u32>,
}

impl CountriesFilter {
    pub fn new(country_ids: Vec<u32>) -> Self {
        CountriesFilter { country_ids }
    }
}

impl Filter for CountriesFilter {
    fn name(&self) -> &'static str {
        "Countries"
    }

    fn is_valid(&self) -> bool {
        !self.country_ids.is_empty()
    }

    filter_body!();
}

/// Caches with the given GC codes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheCodeFilter {
    #[serde(rename = "CacheCodes")]
    pub cache_codes: Vec<String>,
}

impl CacheCodeFilter {
    pub fn new<I, S>(cache_codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CacheCodeFilter {
            cache_codes: cache_codes.into_iter().map(Into::into).collect(),
        }
    }
}

impl Filter for CacheCodeFilter {
    fn name(&self) -> &'static str {
        "CacheCode"
    }

    fn is_valid(&self) -> bool {
        !self.cache_codes.is_empty()
    }

    filter_body!();
}

/// Caches of the given types
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocacheTypeFilter {
    #[serde(rename = "GeocacheTypeIds")]
    pub geocache_types: Vec<GeocacheType>,
}

impl GeocacheTypeFilter {
    /// [`GeocacheType::Unknown`] has no wire code and is dropped
    pub fn new(geocache_types: Vec<GeocacheType>) -> Self {
        GeocacheTypeFilter {
            geocache_types: geocache_types
                .into_iter()
                .filter(|ty| *ty != GeocacheType::Unknown)
                .collect(),
        }
    }
}

impl Filter for GeocacheTypeFilter {
    fn name(&self) -> &'static str {
        "GeocacheType"
    }

    fn is_valid(&self) -> bool {
        !self.geocache_types.is_empty()
    }

    filter_body!();
}

/// Caches with the given container sizes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocacheContainerSizeFilter {
    #[serde(rename = "GeocacheContainerSizeIds")]
    pub container_types: Vec<ContainerType>,
}

impl GeocacheContainerSizeFilter {
    pub fn new(container_types: Vec<ContainerType>) -> Self {
        GeocacheContainerSizeFilter { container_types }
    }
}

impl Filter for GeocacheContainerSizeFilter {
    fn name(&self) -> &'static str {
        "GeocacheContainerSize"
    }

    fn is_valid(&self) -> bool {
        !self.container_types.is_empty()
    }

    filter_body!();
}

fn valid_rating_range(min: f32, max: f32) -> bool {
    (1.0..=5.0).contains(&min) && (1.0..=5.0).contains(&max) && min <= max
}

/// Difficulty rating range, 1.0 to 5.0 in half steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyFilter {
    #[serde(rename = "MinDifficulty")]
    pub min: f32,
    #[serde(rename = "MaxDifficulty")]
    pub max: f32,
}

impl DifficultyFilter {
    pub fn new(min: f32, max: f32) -> Self {
        DifficultyFilter { min, max }
    }
}

impl Filter for DifficultyFilter {
    fn name(&self) -> &'static str {
        "Difficulty"
    }

    fn is_valid(&self) -> bool {
        valid_rating_range(self.min, self.max)
    }

    filter_body!();
}

/// Terrain rating range, 1.0 to 5.0 in half steps
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TerrainFilter {
    #[serde(rename = "MinTerrain")]
    pub min: f32,
    #[serde(rename = "MaxTerrain")]
    pub max: f32,
}

impl TerrainFilter {
    pub fn new(min: f32, max: f32) -> Self {
        TerrainFilter { min, max }
    }
}

impl Filter for TerrainFilter {
    fn name(&self) -> &'static str {
        "Terrain"
    }

    fn is_valid(&self) -> bool {
        valid_rating_range(self.min, self.max)
    }

    filter_body!();
}

/// Restricts archived, available and premium-only caches
///
/// `Some(false)` excludes caches with the flag set; `None` does not filter.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeocacheExclusionsFilter {
    pub archived: Option<bool>,
    pub available: Option<bool>,
    pub premium: Option<bool>,
}

impl GeocacheExclusionsFilter {
    pub fn new(archived: Option<bool>, available: Option<bool>, premium: Option<bool>) -> Self {
        GeocacheExclusionsFilter {
            archived,
            available,
            premium,
        }
    }
}

impl Filter for GeocacheExclusionsFilter {
    fn name(&self) -> &'static str {
        "GeocacheExclusions"
    }

    fn is_valid(&self) -> bool {
        self.archived.is_some() || self.available.is_some() || self.premium.is_some()
    }

    filter_body!();
}

/// Favorite point range
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FavoritePointsFilter {
    #[serde(rename = "MinFavoritePoints")]
    pub min: Option<i32>,
    #[serde(rename = "MaxFavoritePoints")]
    pub max: Option<i32>,
}

impl FavoritePointsFilter {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        FavoritePointsFilter { min, max }
    }
}

impl Filter for FavoritePointsFilter {
    fn name(&self) -> &'static str {
        "FavoritePoints"
    }

    fn is_valid(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            (min, max) => min.is_some() || max.is_some(),
        }
    }

    filter_body!();
}

/// Range of trackables currently in the cache
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrackableCountFilter {
    #[serde(rename = "MinTrackables")]
    pub min: Option<i32>,
    #[serde(rename = "MaxTrackables")]
    pub max: Option<i32>,
}

impl TrackableCountFilter {
    pub fn new(min: Option<i32>, max: Option<i32>) -> Self {
        TrackableCountFilter { min, max }
    }
}

impl Filter for TrackableCountFilter {
    fn name(&self) -> &'static str {
        "TrackableCount"
    }

    fn is_valid(&self) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => min <= max,
            (min, max) => min.is_some() || max.is_some(),
        }
    }

    filter_body!();
}

/// Filters keyed by a list of user names
macro_rules! user_names_filter {
    ($(#[$doc:meta])* $ty:ident, $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Serialize)]
        pub struct $ty {
            #[serde(rename = "UserNames")]
            pub user_names: Vec<String>,
        }

        impl $ty {
            pub fn new<I, S>(user_names: I) -> Self
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                $ty {
                    user_names: user_names.into_iter().map(Into::into).collect(),
                }
            }
        }

        impl Filter for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn is_valid(&self) -> bool {
                !self.user_names.is_empty()
            }

            filter_body!();
        }
    };
}

user_names_filter!(
    /// Leaves out caches found by any of the users
    NotFoundByUsersFilter,
    "NotFoundByUsers"
);
user_names_filter!(
    /// Leaves out caches owned by any of the users
    NotHiddenByUsersFilter,
    "NotHiddenByUsers"
);
user_names_filter!(
    /// Only caches owned by one of the users
    HiddenByUsersFilter,
    "HiddenByUsers"
);

/// Caches whose name contains the text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocacheNameFilter {
    #[serde(rename = "GeocacheName")]
    pub name: String,
}

impl GeocacheNameFilter {
    pub fn new(name: impl Into<String>) -> Self {
        GeocacheNameFilter { name: name.into() }
    }
}

impl Filter for GeocacheNameFilter {
    fn name(&self) -> &'static str {
        "GeocacheName"
    }

    fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }

    filter_body!();
}
