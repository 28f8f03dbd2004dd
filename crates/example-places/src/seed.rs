//! Generated place seed types.
//!
//! These types are independent of engine domain types to avoid circular
//! dependencies.

use serde::{Deserialize, Serialize};

/// A generated example saved place.
///
/// Coordinates are optional so consumers can exercise their handling of
/// incomplete records.
///
/// # Example
///
/// ```
/// use example_places::ExamplePlaceSeed;
///
/// let place = ExamplePlaceSeed {
///     place_id: "example-0000000000000001".to_owned(),
///     name: "Harbour Bakery".to_owned(),
///     category: "cafe".to_owned(),
///     latitude: Some(51.5),
///     longitude: Some(-0.12),
///     street: "1 Quay Street".to_owned(),
///     city: "London".to_owned(),
///     postal_code: "E1 6AN".to_owned(),
///     country: "United Kingdom".to_owned(),
///     entry_point: None,
///     parking: None,
///     accessibility: None,
/// };
///
/// assert!(place.has_coordinates());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplePlaceSeed {
    /// Stable identifier for the place.
    pub place_id: String,
    /// Display name.
    pub name: String,
    /// Lowercase category label.
    pub category: String,
    /// Latitude in WGS84, when generated.
    pub latitude: Option<f64>,
    /// Longitude in WGS84, when generated.
    pub longitude: Option<f64>,
    /// Street line including the building number.
    pub street: String,
    /// City name.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// Country name.
    pub country: String,
    /// Free-text entry point note.
    pub entry_point: Option<String>,
    /// Free-text parking note.
    pub parking: Option<String>,
    /// Free-text accessibility note.
    pub accessibility: Option<String>,
}

impl ExamplePlaceSeed {
    /// Whether both coordinates are present.
    #[must_use]
    pub const fn has_coordinates(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}
