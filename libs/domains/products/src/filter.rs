//! Turns untyped listing parameters into a validated [`Filter`].

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::error::{ProductError, ProductResult};
use crate::models::GeoPoint;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Listing parameters exactly as they arrive on the query string.
///
/// Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RawFilter {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size, clamped to 1..=100 (default 10)
    pub limit: Option<String>,
    /// Search center latitude; requires `longitude`
    pub latitude: Option<String>,
    /// Search center longitude; requires `latitude`
    pub longitude: Option<String>,
    /// Case-insensitive match against name and description
    pub keyword: Option<String>,
}

/// Normalized listing criteria
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    page: u64,
    limit: u64,
    location: Option<GeoPoint>,
    keyword: Option<String>,
}

impl Filter {
    /// Applies the defaulting and clamping rules to already-typed values.
    ///
    /// - `page <= 0` becomes 1
    /// - `limit <= 0` becomes 10, `limit > 100` becomes 100
    /// - coordinates are all-or-nothing and must be in range
    /// - a keyword that is blank after trimming is dropped
    pub fn new(
        page: i64,
        limit: i64,
        latitude: Option<f64>,
        longitude: Option<f64>,
        keyword: Option<&str>,
    ) -> ProductResult<Self> {
        let page = u64::try_from(page).ok().filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE);
        let limit = match u64::try_from(limit) {
            Ok(0) | Err(_) => DEFAULT_LIMIT,
            Ok(l) => l.min(MAX_LIMIT),
        };

        let location = match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some(
                GeoPoint::new(lat, lon).map_err(|e| ProductError::InvalidFilter(e.to_string()))?,
            ),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ProductError::InvalidFilter(
                    "latitude was given without longitude".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(ProductError::InvalidFilter(
                    "longitude was given without latitude".to_string(),
                ));
            }
        };

        let keyword = keyword
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        Ok(Self {
            page,
            limit,
            location,
            keyword,
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            location: None,
            keyword: None,
        }
    }
}

/// The only conversion from query-string input to [`Filter`].
pub fn normalize(raw: RawFilter) -> ProductResult<Filter> {
    let page = parse_field::<i64>("page", raw.page.as_deref())?.unwrap_or(0);
    let limit = parse_field::<i64>("limit", raw.limit.as_deref())?.unwrap_or(0);
    let latitude = parse_field::<f64>("latitude", raw.latitude.as_deref())?;
    let longitude = parse_field::<f64>("longitude", raw.longitude.as_deref())?;

    Filter::new(page, limit, latitude, longitude, raw.keyword.as_deref())
}

fn parse_field<T: std::str::FromStr>(name: &str, value: Option<&str>) -> ProductResult<Option<T>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| ProductError::InvalidFilter(format!("{name} must be a number, got '{v}'"))),
    }
}
