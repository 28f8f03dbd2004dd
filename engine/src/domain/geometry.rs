//! Geographic and screen-space primitives.
//!
//! `LatLng` values are always validated WGS84 degrees; screen points are
//! pixels relative to the map container's top-left corner.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors returned by [`LatLng::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateValidationError {
    /// Latitude or longitude was NaN or infinite.
    #[error("coordinates must be finite, got ({lat}, {lng})")]
    NonFinite {
        /// Rejected latitude.
        lat: f64,
        /// Rejected longitude.
        lng: f64,
    },
    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng", into = "RawLatLng")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Serialize, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Validate and construct a position.
    ///
    /// # Examples
    ///
    /// ```
    /// use placemarks::domain::LatLng;
    ///
    /// let harbour = LatLng::new(50.3755, -4.1427).expect("valid position");
    /// assert_eq!(harbour.lat(), 50.3755);
    /// assert!(LatLng::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateValidationError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateValidationError::NonFinite { lat, lng });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateValidationError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateValidationError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }

    /// Build a position from optional parts, discarding anything invalid.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).ok(),
            _ => None,
        }
    }

    /// Latitude in degrees.
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Arithmetic mean of a set of positions.
    pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        let (count, lat_sum, lng_sum) = points
            .into_iter()
            .fold((0_u32, 0.0, 0.0), |(count, lat, lng), point| {
                (count + 1, lat + point.lat, lng + point.lng)
            });
        if count == 0 {
            return None;
        }
        let divisor = f64::from(count);
        Self::new(lat_sum / divisor, lng_sum / divisor).ok()
    }
}

impl TryFrom<RawLatLng> for LatLng {
    type Error = CoordinateValidationError;

    fn try_from(value: RawLatLng) -> Result<Self, Self::Error> {
        Self::new(value.lat, value.lng)
    }
}

impl From<LatLng> for RawLatLng {
    fn from(value: LatLng) -> Self {
        Self {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Axis-aligned geographic box. Does not model antimeridian wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl GeoBounds {
    /// Tightest box enclosing `points`, or `None` when empty.
    pub fn around<'a>(points: impl IntoIterator<Item = &'a LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (mut south, mut west, mut north, mut east) =
            (first.lat, first.lng, first.lat, first.lng);
        for point in points {
            south = south.min(point.lat);
            north = north.max(point.lat);
            west = west.min(point.lng);
            east = east.max(point.lng);
        }
        Some(Self {
            south_west: LatLng {
                lat: south,
                lng: west,
            },
            north_east: LatLng {
                lat: north,
                lng: east,
            },
        })
    }

    /// Whether `point` lies inside or on the edge of the box.
    pub fn contains(&self, point: &LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    /// Midpoint of the box.
    pub fn center(&self) -> LatLng {
        LatLng {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }
}

/// A pixel position on the map container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    /// Horizontal offset from the left edge.
    pub x: f64,
    /// Vertical offset from the top edge.
    pub y: f64,
}

impl ScreenPoint {
    /// Euclidean distance in pixels.
    pub fn distance_to(&self, other: &Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A pixel offset used when panning the map after centring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenOffset {
    /// Horizontal pan in pixels.
    pub dx: i32,
    /// Vertical pan in pixels; negative moves the view up.
    pub dy: i32,
}
