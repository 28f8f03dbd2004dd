//! Error types for the example-places crate.

use thiserror::Error;

/// Errors that can occur during place generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// The generation area is not a finite, non-negative circle.
    #[error("invalid generation area: centre ({lat}, {lng}) radius {radius_deg}")]
    InvalidArea {
        /// Centre latitude.
        lat: f64,
        /// Centre longitude.
        lng: f64,
        /// Radius in degrees.
        radius_deg: f64,
    },

    /// The missing-coordinate ratio is not a percentage.
    #[error("missing coordinate ratio must be within 0..=100, found {ratio}")]
    InvalidRatio {
        /// The rejected ratio.
        ratio: u8,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_area_formats_correctly() {
        let err = GenerationError::InvalidArea {
            lat: 91.0,
            lng: 0.0,
            radius_deg: 0.5,
        };
        assert_eq!(
            err.to_string(),
            "invalid generation area: centre (91, 0) radius 0.5"
        );
    }

    #[test]
    fn invalid_ratio_formats_correctly() {
        let err = GenerationError::InvalidRatio { ratio: 140 };
        assert_eq!(
            err.to_string(),
            "missing coordinate ratio must be within 0..=100, found 140"
        );
    }
}
