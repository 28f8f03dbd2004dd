//! Named seed definitions controlling place generation.

use crate::error::GenerationError;

const DEFAULT_CENTER_LAT: f64 = 51.5072;
const DEFAULT_CENTER_LNG: f64 = -0.1276;
const DEFAULT_RADIUS_DEG: f64 = 0.05;

/// A named, deterministic place generation request.
///
/// The same definition always yields the same places.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSeedDefinition {
    name: String,
    seed: u64,
    count: usize,
    center_lat: f64,
    center_lng: f64,
    radius_deg: f64,
    missing_coordinate_ratio: u8,
}

impl PlaceSeedDefinition {
    /// Build a definition centred on central London with no missing
    /// coordinates.
    #[must_use]
    pub fn new(name: impl Into<String>, seed: u64, count: usize) -> Self {
        Self {
            name: name.into(),
            seed,
            count,
            center_lat: DEFAULT_CENTER_LAT,
            center_lng: DEFAULT_CENTER_LNG,
            radius_deg: DEFAULT_RADIUS_DEG,
            missing_coordinate_ratio: 0,
        }
    }

    /// Move the generation centre.
    #[must_use]
    pub fn with_center(mut self, lat: f64, lng: f64) -> Self {
        self.center_lat = lat;
        self.center_lng = lng;
        self
    }

    /// Set the spread of generated positions, in degrees.
    #[must_use]
    pub fn with_radius_deg(mut self, radius_deg: f64) -> Self {
        self.radius_deg = radius_deg;
        self
    }

    /// Percentage of places generated without coordinates.
    #[must_use]
    pub fn with_missing_coordinate_ratio(mut self, ratio: u8) -> Self {
        self.missing_coordinate_ratio = ratio;
        self
    }

    /// Returns the definition name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of places to generate.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Returns the generation centre as `(lat, lng)`.
    #[must_use]
    pub const fn center(&self) -> (f64, f64) {
        (self.center_lat, self.center_lng)
    }

    /// Returns the spread in degrees.
    #[must_use]
    pub const fn radius_deg(&self) -> f64 {
        self.radius_deg
    }

    /// Returns the missing-coordinate percentage.
    #[must_use]
    pub const fn missing_coordinate_ratio(&self) -> u8 {
        self.missing_coordinate_ratio
    }

    pub(crate) fn validate(&self) -> Result<(), GenerationError> {
        let area_is_valid = self.center_lat.is_finite()
            && self.center_lng.is_finite()
            && self.radius_deg.is_finite()
            && self.radius_deg >= 0.0
            && (-90.0..=90.0).contains(&self.center_lat)
            && (-180.0..=180.0).contains(&self.center_lng);
        if !area_is_valid {
            return Err(GenerationError::InvalidArea {
                lat: self.center_lat,
                lng: self.center_lng,
                radius_deg: self.radius_deg,
            });
        }
        if self.missing_coordinate_ratio > 100 {
            return Err(GenerationError::InvalidRatio {
                ratio: self.missing_coordinate_ratio,
            });
        }
        Ok(())
    }
}
