use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Mean Earth radius used for great-circle distances
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{axis} must be a finite number between -{bound} and {bound}, got {value}")]
pub struct InvalidCoordinate {
    pub axis: &'static str,
    pub bound: f64,
    pub value: f64,
}

/// A WGS84 position. Always holds an in-range latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonPoint", into = "GeoJsonPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        check_axis("latitude", 90.0, latitude)?;
        check_axis("longitude", 180.0, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine distance in meters
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * a.sqrt().min(1.0).asin()
    }
}

fn check_axis(axis: &'static str, bound: f64, value: f64) -> Result<(), InvalidCoordinate> {
    if value.is_finite() && (-bound..=bound).contains(&value) {
        Ok(())
    } else {
        Err(InvalidCoordinate { axis, bound, value })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GeoJsonType {
    Point,
}

/// GeoJSON representation of [`GeoPoint`]: `{"type": "Point", "coordinates": [lon, lat]}`.
///
/// This is both the wire format and the stored format, so MongoDB can build a
/// `2dsphere` index over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoJsonPoint {
    #[serde(rename = "type")]
    pub kind: GeoJsonType,
    /// `[longitude, latitude]`
    pub coordinates: Vec<f64>,
}

impl From<GeoPoint> for GeoJsonPoint {
    fn from(point: GeoPoint) -> Self {
        Self {
            kind: GeoJsonType::Point,
            coordinates: vec![point.longitude, point.latitude],
        }
    }
}

impl TryFrom<GeoJsonPoint> for GeoPoint {
    type Error = String;

    fn try_from(value: GeoJsonPoint) -> Result<Self, Self::Error> {
        match value.coordinates.as_slice() {
            [longitude, latitude] => {
                GeoPoint::new(*latitude, *longitude).map_err(|e| e.to_string())
            }
            other => Err(format!(
                "coordinates must be [longitude, latitude], got {} values",
                other.len()
            )),
        }
    }
}

/// Current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 timestamps (`2024-05-01T10:00:00.000000Z`).
///
/// Fixed width keeps lexicographic and chronological order identical once
/// stored as strings, which the newest-first sort relies on.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// A stored product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Assigned by the repository on store; stored as `_id`
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<GeoJsonPoint>)]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// A new record with a fresh time-ordered id
    pub fn new(payload: ProductPayload) -> Self {
        Self::with_id(Uuid::now_v7(), payload)
    }

    /// A record carrying `payload` under an existing id; used as the
    /// replacement value for updates.
    pub fn with_id(id: Uuid, payload: ProductPayload) -> Self {
        let now = now();
        Self {
            id,
            name: payload.name,
            price: payload.price,
            location: payload.location,
            description: payload.description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites the mutable fields with those of `replacement`.
    pub fn replace_with(&mut self, replacement: &Product) {
        self.name.clone_from(&replacement.name);
        self.price = replacement.price;
        self.location = replacement.location;
        self.description.clone_from(&replacement.description);
        self.updated_at = replacement.updated_at;
    }
}

/// Body of create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_payload"))]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 200, message = "name must be between 1 and 200 characters"))]
    #[schema(example = "Chair")]
    pub name: String,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    #[schema(example = 100.0)]
    pub price: f64,
    #[serde(default)]
    #[schema(value_type = Option<GeoJsonPoint>)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
}

fn validate_payload(payload: &ProductPayload) -> Result<(), ValidationError> {
    if payload.name.trim().is_empty() {
        return Err(ValidationError::new("blank_name").with_message("name must not be blank".into()));
    }
    if !payload.price.is_finite() {
        return Err(
            ValidationError::new("non_finite_price").with_message("price must be a finite number".into()),
        );
    }
    Ok(())
}

/// A page of products, serialized as `{"data": [...], "pagination": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    #[serde(rename = "data")]
    pub items: Vec<Product>,
    pub pagination: crate::pagination::PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Deleted successfully")]
    pub message: String,
}

impl DeleteResponse {
    pub fn deleted() -> Self {
        Self {
            message: "Deleted successfully".to_string(),
        }
    }
}
